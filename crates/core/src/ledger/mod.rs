//! Ledger module - the engine behind every balance-affecting mutation.

mod ledger_service;

pub use ledger_service::LedgerService;
