//! Income projects module - milestone-driven income plans.

mod projects_model;

pub use projects_model::{IncomeProject, Milestone, ProjectStatus};
