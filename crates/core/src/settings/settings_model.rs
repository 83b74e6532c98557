//! Configuration scalars and the saved allocation split.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::DEFAULT_AUTO_DEDUCT_PERCENT;
use crate::utils::json_utils::{bool_field, opt_str_field, percent_field, str_field};

/// Application settings persisted as one record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// When enabled, INCOME transactions divert a percentage into the
    /// savings wallet.
    pub auto_deduct_enabled: bool,
    /// Percentage of income diverted, 0 to 100.
    pub auto_deduct_percent: u8,
    /// Destination wallet for auto-deducted savings.
    pub savings_wallet_id: Option<String>,
    /// Free-form tone hint forwarded to the insights provider.
    pub tone_hint: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            auto_deduct_enabled: false,
            auto_deduct_percent: DEFAULT_AUTO_DEDUCT_PERCENT,
            savings_wallet_id: None,
            tone_hint: String::new(),
        }
    }
}

impl AppSettings {
    pub(crate) fn sanitize(record: &Value) -> AppSettings {
        let defaults = AppSettings::default();
        AppSettings {
            auto_deduct_enabled: bool_field(record, "autoDeductEnabled", false),
            auto_deduct_percent: percent_field(
                record,
                "autoDeductPercent",
                defaults.auto_deduct_percent,
            ),
            savings_wallet_id: opt_str_field(record, "savingsWalletId"),
            tone_hint: str_field(record, "toneHint", ""),
        }
    }
}

/// Target type of one allocation split entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationKind {
    /// Real money movement into a goal.
    Goal,
    /// Virtual bookkeeping toward a fixed cost.
    Cost,
}

/// One entry of the saved percentage-split configuration. Config only, not
/// financial state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationItem {
    pub item_id: String,
    #[serde(rename = "type")]
    pub kind: AllocationKind,
    pub percentage: u8,
    pub is_enabled: bool,
}

impl AllocationItem {
    pub(crate) fn sanitize(record: &Value) -> Option<AllocationItem> {
        let item_id = str_field(record, "itemId", "");
        if item_id.is_empty() {
            return None;
        }
        let kind = match str_field(record, "type", "").trim().to_ascii_uppercase().as_str() {
            "GOAL" => AllocationKind::Goal,
            "COST" => AllocationKind::Cost,
            _ => return None,
        };
        Some(AllocationItem {
            item_id,
            kind,
            percentage: percent_field(record, "percentage", 0),
            is_enabled: bool_field(record, "isEnabled", false),
        })
    }
}
