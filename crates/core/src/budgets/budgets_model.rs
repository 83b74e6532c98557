//! Monthly budget domain models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::json_utils::{amount_field, str_field};

/// A per-category monthly spending limit. One row per category.
///
/// `spent` is an informational cache; the authoritative figure is recomputed
/// from the transaction ledger at read time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub category: String,
    pub limit: i64,
    pub spent: i64,
    pub carryover_debt: i64,
}

impl Budget {
    pub fn new(category: &str, limit: i64) -> Self {
        Budget {
            category: category.trim().to_string(),
            limit: limit.max(0),
            spent: 0,
            carryover_debt: 0,
        }
    }

    pub(crate) fn sanitize(record: &Value) -> Option<Budget> {
        let category = str_field(record, "category", "");
        if category.is_empty() {
            return None;
        }
        Some(Budget {
            category,
            limit: amount_field(record, "limit", 0).max(0),
            spent: amount_field(record, "spent", 0).max(0),
            carryover_debt: amount_field(record, "carryoverDebt", 0).max(0),
        })
    }
}

/// Read-time evaluation of one budget for a given month. Never stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub category: String,
    pub limit: i64,
    /// Recomputed from EXPENSE transactions, not the stored cache.
    pub spent: i64,
    pub remaining: i64,
    pub over_limit: bool,
    pub carryover_debt: i64,
}
