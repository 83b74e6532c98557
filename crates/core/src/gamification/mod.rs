//! Gamification module - points, ranks, and completed-plan history.

mod gamification_model;
mod gamification_service;

pub use gamification_model::{AwardResult, CompletedPlan, GamificationState, Rank, RankChange};
pub use gamification_service::{award_points, GamificationService};
