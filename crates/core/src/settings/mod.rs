//! Settings module - configuration scalars and the saved allocation split.

mod settings_model;

pub use settings_model::{AllocationItem, AllocationKind, AppSettings};
