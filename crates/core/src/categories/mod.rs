//! Categories module - the seeded, user-extensible category list.

mod categories_model;
mod categories_service;

pub(crate) use categories_model::{contains_category, default_categories, sanitize_categories};
pub use categories_service::CategoryService;
