//! Wallets module - domain model only; mutations go through the ledger.

mod wallets_model;

pub use wallets_model::Wallet;
