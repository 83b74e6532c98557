//! Insights service: snapshot assembly and report refresh.

use std::sync::Arc;

use log::warn;

use crate::constants::SNAPSHOT_RECENT_TRANSACTIONS;
use crate::errors::Result;
use crate::store::{keys, EntityRepository};

use super::insights_model::{FinancialSnapshot, InsightsReport};
use super::insights_traits::InsightsProviderTrait;

/// Builds snapshots for the enrichment provider and keeps the last
/// successful report around. Financial mutations never pass through here,
/// so a failing provider cannot affect stored money state.
pub struct InsightsService {
    repository: Arc<EntityRepository>,
    provider: Arc<dyn InsightsProviderTrait>,
}

impl InsightsService {
    pub fn new(repository: Arc<EntityRepository>, provider: Arc<dyn InsightsProviderTrait>) -> Self {
        InsightsService {
            repository,
            provider,
        }
    }

    /// Assembles a fresh snapshot of the stored financial state.
    pub fn build_snapshot(&self) -> Result<FinancialSnapshot> {
        let mut transactions = self.repository.get_transactions()?;
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        transactions.truncate(SNAPSHOT_RECENT_TRANSACTIONS);
        Ok(FinancialSnapshot {
            wallets: self.repository.get_wallets()?,
            recent_transactions: transactions,
            goals: self.repository.get_goals()?,
            fixed_costs: self.repository.get_fixed_costs()?,
            budgets: self.repository.get_budgets()?,
            gamification: self.repository.get_gamification()?,
            tone_hint: self.repository.get_settings()?.tone_hint,
        })
    }

    /// Invokes the provider on a fresh snapshot. A successful report is
    /// persisted and returned; a failed call returns `None` and leaves the
    /// previously stored report in place.
    pub async fn refresh_report(&self) -> Result<Option<InsightsReport>> {
        let snapshot = self.build_snapshot()?;
        match self.provider.generate_report(&snapshot).await {
            Some(report) => {
                let raw = serde_json::to_string(&report)?;
                self.repository.set_raw(keys::INSIGHTS_REPORT, &raw)?;
                Ok(Some(report))
            }
            None => {
                warn!("insights provider returned nothing, keeping the stored report");
                Ok(None)
            }
        }
    }

    /// The last successfully generated report, if any survives parsing.
    pub fn last_report(&self) -> Result<Option<InsightsReport>> {
        match self.repository.get_raw(keys::INSIGHTS_REPORT)? {
            Some(raw) => Ok(serde_json::from_str(&raw).ok()),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "insights_service_tests.rs"]
mod insights_service_tests;
