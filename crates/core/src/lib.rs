//! WalletKeeper core: a small single-writer embedded ledger store for
//! personal finances.
//!
//! Everything revolves around the [`store::EntityRepository`], which
//! persists each entity collection as a JSON document in any
//! [`store::KvBackend`] and sanitizes every read. The [`ledger`] engine
//! owns all balance-affecting mutations; [`budgets`], [`fixed_costs`] and
//! [`projects`] evaluate stored data at read time; [`gamification`] accrues
//! points for collected income projects; [`insights`] is the asynchronous
//! enrichment boundary.
//!
//! Amounts are integers in the smallest currency unit. This crate is
//! storage-agnostic; the SQLite backend lives in the companion storage
//! crate.

pub mod budgets;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod fixed_costs;
pub mod gamification;
pub mod goals;
pub mod insights;
pub mod ledger;
pub mod projects;
pub mod settings;
pub mod store;
pub mod transactions;
pub mod utils;
pub mod wallets;

pub use errors::{DatabaseError, Error, LedgerError, Result, ValidationError};
