//! SQLite persistence for the WalletKeeper store.
//!
//! Implements the core's [`KvBackend`](walletkeeper_core::store::KvBackend)
//! over a single `collections` table: one row per collection, holding the
//! serialized JSON document. This is the only crate that knows SQLite
//! exists; every failure crosses the boundary as a storage-agnostic
//! `DatabaseError`.

mod backend;

pub use backend::SqliteBackend;
