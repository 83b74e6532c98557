//! Budgets module - per-category monthly limits and their evaluation.

mod budgets_model;
mod budgets_service;

pub use budgets_model::{Budget, BudgetStatus};
pub use budgets_service::BudgetService;
