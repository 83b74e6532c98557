//! Fixed cost (recurring bill) domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::utils::json_utils::{amount_field, str_field};
use crate::utils::time_utils::{days_until, parse_business_date};

/// A recurring bill with a running "saved toward it" amount.
///
/// `allocated_amount` is virtual bookkeeping: allocation runs increment it
/// without moving real money, and paying the bill resets it to zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FixedCost {
    pub id: String,
    pub title: String,
    /// Expected amount due each cycle.
    pub amount: i64,
    pub allocated_amount: i64,
    pub next_due_date: NaiveDate,
    /// Billing cycle length in calendar months, at least 1.
    pub frequency_months: u32,
    pub description: String,
}

/// Read-time due status; never stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FixedCostStatus {
    pub days_until_due: i64,
    pub overdue: bool,
    /// How much of the expected amount has been set aside.
    pub allocated_amount: i64,
    pub shortfall: i64,
}

impl FixedCost {
    pub fn new(title: &str, amount: i64, next_due_date: NaiveDate, frequency_months: u32) -> Self {
        FixedCost {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            amount,
            allocated_amount: 0,
            next_due_date,
            frequency_months: frequency_months.max(1),
            description: String::new(),
        }
    }

    /// Due/overdue evaluation relative to `now`.
    pub fn status(&self, now: DateTime<Utc>) -> FixedCostStatus {
        let days = days_until(self.next_due_date, now);
        FixedCostStatus {
            days_until_due: days,
            overdue: days < 0,
            allocated_amount: self.allocated_amount,
            shortfall: (self.amount - self.allocated_amount).max(0),
        }
    }

    pub(crate) fn sanitize(record: &Value) -> Option<FixedCost> {
        let id = str_field(record, "id", "");
        if id.is_empty() {
            return None;
        }
        Some(FixedCost {
            id,
            title: str_field(record, "title", "Bill"),
            amount: amount_field(record, "amount", 0).max(0),
            allocated_amount: amount_field(record, "allocatedAmount", 0).max(0),
            next_due_date: parse_business_date(&str_field(record, "nextDueDate", ""))
                .unwrap_or_else(|| Utc::now().date_naive()),
            frequency_months: amount_field(record, "frequencyMonths", 1).clamp(1, 120) as u32,
            description: str_field(record, "description", ""),
        })
    }
}
