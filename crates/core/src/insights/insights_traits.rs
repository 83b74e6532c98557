use async_trait::async_trait;

use super::insights_model::{FinancialSnapshot, InsightsReport};

/// Asynchronous enrichment collaborator. Implementations live outside the
/// core; a failed or unavailable provider answers `None`, never an error,
/// and the core continues on stored data.
#[async_trait]
pub trait InsightsProviderTrait: Send + Sync {
    async fn generate_report(&self, snapshot: &FinancialSnapshot) -> Option<InsightsReport>;
}
