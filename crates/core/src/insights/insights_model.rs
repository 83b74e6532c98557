//! Snapshot and report shapes for the insights boundary.

use serde::{Deserialize, Serialize};

use crate::budgets::Budget;
use crate::fixed_costs::FixedCost;
use crate::gamification::GamificationState;
use crate::goals::Goal;
use crate::transactions::Transaction;
use crate::wallets::Wallet;

/// Structured view of the stored financial state handed to the enrichment
/// provider. Assembled fresh per call; never persisted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub wallets: Vec<Wallet>,
    /// Most recent ledger entries, newest first.
    pub recent_transactions: Vec<Transaction>,
    pub goals: Vec<Goal>,
    pub fixed_costs: Vec<FixedCost>,
    pub budgets: Vec<Budget>,
    pub gamification: GamificationState,
    /// Free-form tone hint from settings, forwarded verbatim.
    pub tone_hint: String,
}

/// Enrichment result returned by the provider. Absence of a report is a
/// normal outcome; the previously stored report keeps serving.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsightsReport {
    /// Overall financial health, 0 to 100.
    pub health_score: u8,
    pub income_efficiency: String,
    pub budget_discipline: String,
    pub wealth_velocity: String,
    pub advice: String,
}
