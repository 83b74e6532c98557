//! Gamification domain models: points, ranks, and completed-plan history.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::utils::json_utils::{amount_field, str_field};
use crate::utils::time_utils::parse_business_date;

/// Rank ladder with fixed point thresholds. Diamond is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
}

impl Rank {
    const LADDER: [(Rank, i64); 7] = [
        (Rank::Iron, 0),
        (Rank::Bronze, 500),
        (Rank::Silver, 1_500),
        (Rank::Gold, 4_000),
        (Rank::Platinum, 10_000),
        (Rank::Emerald, 25_000),
        (Rank::Diamond, 60_000),
    ];

    /// Highest rank whose threshold does not exceed the point total.
    pub fn for_points(points: i64) -> Rank {
        Rank::LADDER
            .iter()
            .rev()
            .find(|(_, threshold)| points >= *threshold)
            .map(|(rank, _)| *rank)
            .unwrap_or(Rank::Iron)
    }

    /// Points required to hold this rank.
    pub fn threshold(self) -> i64 {
        Rank::LADDER
            .iter()
            .find(|(rank, _)| *rank == self)
            .map(|(_, threshold)| *threshold)
            .unwrap_or(0)
    }

    /// The next rank up, or `None` at the top of the ladder.
    pub fn next(self) -> Option<Rank> {
        let idx = Rank::LADDER.iter().position(|(rank, _)| *rank == self)?;
        Rank::LADDER.get(idx + 1).map(|(rank, _)| *rank)
    }
}

/// Singleton progression state. Points never decrease; rank is derived from
/// points and recomputed on every award.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GamificationState {
    pub points: i64,
    pub rank: Rank,
    /// Epoch milliseconds of the last award.
    pub last_updated: i64,
}

impl Default for GamificationState {
    fn default() -> Self {
        GamificationState {
            points: 0,
            rank: Rank::Iron,
            last_updated: 0,
        }
    }
}

impl GamificationState {
    pub(crate) fn sanitize(record: &Value) -> GamificationState {
        let points = amount_field(record, "points", 0).max(0);
        GamificationState {
            points,
            // The stored rank is a cache; points are the ground truth.
            rank: Rank::for_points(points),
            last_updated: amount_field(record, "lastUpdated", 0),
        }
    }
}

/// Append-only record of a collected income project. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedPlan {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub earned_amount: i64,
    pub completed_at: NaiveDate,
    pub points_awarded: i64,
}

impl CompletedPlan {
    pub(crate) fn sanitize(record: &Value) -> Option<CompletedPlan> {
        let id = str_field(record, "id", "");
        if id.is_empty() {
            return None;
        }
        Some(CompletedPlan {
            id,
            project_id: str_field(record, "projectId", ""),
            name: str_field(record, "name", ""),
            earned_amount: amount_field(record, "earnedAmount", 0).max(0),
            completed_at: parse_business_date(&str_field(record, "completedAt", ""))
                .unwrap_or_else(|| Utc::now().date_naive()),
            points_awarded: amount_field(record, "pointsAwarded", 0).max(0),
        })
    }
}

/// Rank promotion surfaced to the caller for notification.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RankChange {
    pub from: Rank,
    pub to: Rank,
}

/// Outcome of awarding points for a collected project.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwardResult {
    pub points_awarded: i64,
    pub total_points: i64,
    pub rank: Rank,
    pub rank_change: Option<RankChange>,
    pub plan: CompletedPlan,
}

pub(crate) fn new_plan_id() -> String {
    Uuid::new_v4().to_string()
}
