//! Income project domain models and status derivation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::utils::json_utils::{amount_field, array_field, bool_field, opt_str_field, str_field};
use crate::utils::time_utils::parse_business_date;

/// Lifecycle of an income project. Stored values are a cache; the
/// authoritative value comes from [`IncomeProject::derive_status`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Storable initial value only; derivation always overrides it.
    Planning,
    Upcoming,
    InProgress,
    Completed,
    Overdue,
}

impl ProjectStatus {
    fn from_raw(raw: &str) -> ProjectStatus {
        match raw.trim().to_ascii_lowercase().as_str() {
            "planning" => ProjectStatus::Planning,
            "upcoming" => ProjectStatus::Upcoming,
            "completed" => ProjectStatus::Completed,
            "overdue" => ProjectStatus::Overdue,
            _ => ProjectStatus::InProgress,
        }
    }
}

/// A step toward completing an income project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
}

/// A planned income-generating effort broken into milestones. Completing it
/// and collecting its income produces a real INCOME transaction plus
/// gamification points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeProject {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub expected_income: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Cached status; may be stale. Use [`IncomeProject::derive_status`].
    pub status: ProjectStatus,
    pub milestones: Vec<Milestone>,
    /// Set once the project's income has been collected into a wallet.
    pub collected: bool,
}

impl IncomeProject {
    pub fn new(name: &str, expected_income: i64) -> Self {
        IncomeProject {
            id: Uuid::new_v4().to_string(),
            user_id: String::new(),
            name: name.to_string(),
            description: String::new(),
            expected_income,
            start_date: None,
            end_date: None,
            status: ProjectStatus::Planning,
            milestones: Vec::new(),
            collected: false,
        }
    }

    /// Authoritative status, evaluated in precedence order:
    /// completed (all milestones done), overdue (past end date), upcoming
    /// (before start date), in progress otherwise.
    ///
    /// A project with zero milestones never derives `Completed` here; rule 1
    /// requires at least one milestone.
    pub fn derive_status(&self, today: NaiveDate) -> ProjectStatus {
        if !self.milestones.is_empty() && self.milestones.iter().all(|m| m.is_completed) {
            return ProjectStatus::Completed;
        }
        if let Some(end) = self.end_date {
            if end < today {
                return ProjectStatus::Overdue;
            }
        }
        if let Some(start) = self.start_date {
            if start > today {
                return ProjectStatus::Upcoming;
            }
        }
        ProjectStatus::InProgress
    }

    pub fn completed_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.is_completed).count()
    }

    pub(crate) fn sanitize(record: &Value) -> Option<IncomeProject> {
        let id = str_field(record, "id", "");
        if id.is_empty() {
            return None;
        }
        Some(IncomeProject {
            id,
            user_id: str_field(record, "userId", ""),
            name: str_field(record, "name", "Project"),
            description: str_field(record, "description", ""),
            expected_income: amount_field(record, "expectedIncome", 0).max(0),
            start_date: opt_str_field(record, "startDate")
                .as_deref()
                .and_then(parse_business_date),
            end_date: opt_str_field(record, "endDate")
                .as_deref()
                .and_then(parse_business_date),
            status: ProjectStatus::from_raw(&str_field(record, "status", "")),
            milestones: array_field(record, "milestones")
                .iter()
                .filter_map(Milestone::sanitize)
                .collect(),
            collected: bool_field(record, "collected", false),
        })
    }
}

impl Milestone {
    fn sanitize(record: &Value) -> Option<Milestone> {
        let title = str_field(record, "title", "");
        let id = str_field(record, "id", "");
        if id.is_empty() && title.is_empty() {
            return None;
        }
        Some(Milestone {
            id: if id.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                id
            },
            title,
            due_date: opt_str_field(record, "dueDate")
                .as_deref()
                .and_then(parse_business_date),
            is_completed: bool_field(record, "isCompleted", false),
        })
    }
}
