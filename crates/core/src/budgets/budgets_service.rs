//! Budget evaluation service.

use std::sync::Arc;

use chrono::Datelike;

use crate::errors::{Result, ValidationError};
use crate::store::EntityRepository;
use crate::transactions::{Transaction, TransactionType};

use super::budgets_model::{Budget, BudgetStatus};

/// Read-time budget evaluation plus the upsert write. The stored `spent`
/// cache is never consulted; every figure is recomputed from the ledger.
pub struct BudgetService {
    repository: Arc<EntityRepository>,
}

impl BudgetService {
    pub fn new(repository: Arc<EntityRepository>) -> Self {
        BudgetService { repository }
    }

    /// Sum of EXPENSE transactions in `category` during the given calendar
    /// month. Pure reduction over the ledger.
    pub fn spent_by_category(&self, category: &str, month: u32, year: i32) -> Result<i64> {
        let transactions = self.repository.get_transactions()?;
        Ok(sum_expenses(&transactions, category, month, year))
    }

    /// Limit vs recomputed spent for every budget, for one calendar month.
    pub fn budget_overview(&self, month: u32, year: i32) -> Result<Vec<BudgetStatus>> {
        let budgets = self.repository.get_budgets()?;
        let transactions = self.repository.get_transactions()?;
        Ok(budgets
            .iter()
            .map(|budget| {
                let spent = sum_expenses(&transactions, &budget.category, month, year);
                BudgetStatus {
                    category: budget.category.clone(),
                    limit: budget.limit,
                    spent,
                    remaining: budget.limit - spent,
                    over_limit: spent > budget.limit,
                    carryover_debt: budget.carryover_debt,
                }
            })
            .collect())
    }

    /// Creates or replaces the budget for `category`. One row per category;
    /// the match is case-insensitive and the stored spent cache resets.
    pub fn upsert_budget(&self, category: &str, limit: i64) -> Result<Budget> {
        let trimmed = category.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField("category".to_string()).into());
        }
        if limit < 0 {
            return Err(
                ValidationError::InvalidInput(format!("budget limit {limit} is negative")).into(),
            );
        }
        let mut budgets = self.repository.get_budgets()?;
        let budget = Budget::new(trimmed, limit);
        match budgets
            .iter_mut()
            .find(|b| b.category.eq_ignore_ascii_case(trimmed))
        {
            Some(existing) => *existing = budget.clone(),
            None => budgets.push(budget.clone()),
        }
        self.repository.set_budgets(&budgets)?;
        Ok(budget)
    }
}

fn sum_expenses(transactions: &[Transaction], category: &str, month: u32, year: i32) -> i64 {
    transactions
        .iter()
        .filter(|tx| tx.tx_type == TransactionType::Expense)
        .filter(|tx| tx.category.eq_ignore_ascii_case(category.trim()))
        .filter(|tx| tx.date.month() == month && tx.date.year() == year)
        .map(|tx| tx.amount)
        .sum()
}

#[cfg(test)]
#[path = "budgets_service_tests.rs"]
mod budgets_service_tests;
