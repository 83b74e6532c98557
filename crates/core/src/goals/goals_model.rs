//! Savings goal domain models.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::utils::json_utils::{amount_field, array_field, opt_str_field, str_field};
use crate::utils::time_utils::parse_business_date;

/// A savings target with its contribution history.
///
/// Invariant: `current_amount` equals the sum of `rounds[].amount`; the
/// ledger engine maintains both in the same write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: i64,
    pub current_amount: i64,
    pub deadline: Option<NaiveDate>,
    pub rounds: Vec<GoalRound>,
}

/// One contribution toward a goal; append-only history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalRound {
    pub id: String,
    pub date: NaiveDate,
    pub amount: i64,
    pub contributor_id: String,
    pub note: String,
}

impl Goal {
    pub fn new(name: &str, target_amount: i64, deadline: Option<NaiveDate>) -> Self {
        Goal {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            target_amount,
            current_amount: 0,
            deadline,
            rounds: Vec::new(),
        }
    }

    /// Recomputes the contribution total from the rounds history. The
    /// stored `current_amount` is a denormalized cache of this value.
    pub fn contributed_total(&self) -> i64 {
        self.rounds.iter().map(|r| r.amount).sum()
    }

    pub(crate) fn sanitize(record: &Value) -> Option<Goal> {
        let id = str_field(record, "id", "");
        if id.is_empty() {
            return None;
        }
        let rounds: Vec<GoalRound> = array_field(record, "rounds")
            .iter()
            .filter_map(GoalRound::sanitize)
            .collect();
        let mut goal = Goal {
            id,
            name: str_field(record, "name", "Goal"),
            target_amount: amount_field(record, "targetAmount", 0).max(0),
            current_amount: 0,
            deadline: opt_str_field(record, "deadline")
                .as_deref()
                .and_then(parse_business_date),
            rounds,
        };
        // The rounds history is the ground truth for the cached total.
        goal.current_amount = goal.contributed_total();
        Some(goal)
    }
}

impl GoalRound {
    pub(crate) fn new(date: NaiveDate, amount: i64, contributor_id: &str, note: &str) -> Self {
        GoalRound {
            id: Uuid::new_v4().to_string(),
            date,
            amount,
            contributor_id: contributor_id.to_string(),
            note: note.to_string(),
        }
    }

    fn sanitize(record: &Value) -> Option<GoalRound> {
        let amount = amount_field(record, "amount", 0);
        if amount <= 0 {
            return None;
        }
        Some(GoalRound {
            id: str_field(record, "id", &Uuid::new_v4().to_string()),
            date: parse_business_date(&str_field(record, "date", ""))
                .unwrap_or_else(|| Utc::now().date_naive()),
            amount,
            contributor_id: str_field(record, "contributorId", ""),
            note: str_field(record, "note", ""),
        })
    }
}
