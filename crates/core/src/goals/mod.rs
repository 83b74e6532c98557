//! Goals module - savings targets and their contribution history.

mod goals_model;

pub use goals_model::{Goal, GoalRound};
