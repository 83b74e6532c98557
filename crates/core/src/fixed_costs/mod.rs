//! Fixed costs module - recurring bills and their due evaluation.

mod fixed_costs_model;

pub use fixed_costs_model::{FixedCost, FixedCostStatus};
