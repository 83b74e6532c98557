//! Insights module - the asynchronous enrichment boundary.

mod insights_model;
mod insights_service;
mod insights_traits;

pub use insights_model::{FinancialSnapshot, InsightsReport};
pub use insights_service::InsightsService;
pub use insights_traits::InsightsProviderTrait;
