//! Transactions module - the append-only ledger entries.

mod transactions_model;

pub use transactions_model::{NewTransaction, Transaction, TransactionType};
