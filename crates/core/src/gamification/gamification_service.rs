//! Point accrual and rank evaluation.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::debug;

use crate::errors::Result;
use crate::projects::IncomeProject;
use crate::store::{EntityRepository, WriteBatch};

use super::gamification_model::{
    new_plan_id, AwardResult, CompletedPlan, Rank, RankChange,
};

/// Points per 10,000 VND of collected income.
const INCOME_POINT_DIVISOR: i64 = 10_000;
/// Points per milestone on the collected project.
const MILESTONE_BONUS: i64 = 50;

/// Accrues points for collected income projects and evaluates the rank
/// ladder. Points only ever increase here.
pub struct GamificationService {
    repository: Arc<EntityRepository>,
}

impl GamificationService {
    pub fn new(repository: Arc<EntityRepository>) -> Self {
        GamificationService { repository }
    }

    pub fn state(&self) -> Result<super::GamificationState> {
        self.repository.get_gamification()
    }

    pub fn history(&self) -> Result<Vec<CompletedPlan>> {
        self.repository.get_completed_plans()
    }

    /// Awards points for a collected project and appends the completed-plan
    /// record, in one atomic write.
    ///
    /// `base = floor(expected_income / 10000)`, plus 50 per milestone; the
    /// whole total is multiplied by 1.2 (floored) when collected on or
    /// before the project's end date.
    pub fn award_for_completed_project(
        &self,
        project: &IncomeProject,
        today: NaiveDate,
    ) -> Result<AwardResult> {
        let points = award_points(project, today);

        let mut state = self.repository.get_gamification()?;
        let mut plans = self.repository.get_completed_plans()?;

        let old_rank = state.rank;
        state.points += points;
        state.rank = Rank::for_points(state.points);
        state.last_updated = Utc::now().timestamp_millis();

        let plan = CompletedPlan {
            id: new_plan_id(),
            project_id: project.id.clone(),
            name: project.name.clone(),
            earned_amount: project.expected_income,
            completed_at: today,
            points_awarded: points,
        };
        plans.push(plan.clone());

        let mut batch = WriteBatch::new();
        batch.gamification(&state)?;
        batch.completed_plans(&plans)?;
        self.repository.commit(batch)?;

        let rank_change = (state.rank != old_rank).then_some(RankChange {
            from: old_rank,
            to: state.rank,
        });
        if let Some(change) = &rank_change {
            debug!("rank up: {:?} -> {:?}", change.from, change.to);
        }

        Ok(AwardResult {
            points_awarded: points,
            total_points: state.points,
            rank: state.rank,
            rank_change,
            plan,
        })
    }
}

/// Point formula for one collected project, as pure integer arithmetic.
pub fn award_points(project: &IncomeProject, today: NaiveDate) -> i64 {
    let base = project.expected_income.max(0) / INCOME_POINT_DIVISOR;
    let bonus = project.milestones.len() as i64 * MILESTONE_BONUS;
    let total = base + bonus;
    let on_time = project.end_date.map_or(false, |end| today <= end);
    if on_time {
        // 1.2x, floored.
        total * 6 / 5
    } else {
        total
    }
}

#[cfg(test)]
#[path = "gamification_service_tests.rs"]
mod gamification_service_tests;
