//! Typed entity repository over a key-value backend.
//!
//! Each collection is one JSON document under a fixed key. Every read runs
//! the collection's sanitizer, so malformed or drifted records are coerced
//! to safe values instead of failing the read. Backend I/O errors still
//! propagate.

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::budgets::Budget;
use crate::categories::{default_categories, sanitize_categories};
use crate::errors::Result;
use crate::fixed_costs::FixedCost;
use crate::gamification::{CompletedPlan, GamificationState};
use crate::goals::Goal;
use crate::projects::IncomeProject;
use crate::settings::{AllocationItem, AppSettings};
use crate::transactions::Transaction;
use crate::wallets::Wallet;

use super::backend::KvBackend;

/// Storage keys, one per collection.
pub mod keys {
    pub const WALLETS: &str = "wallets";
    pub const TRANSACTIONS: &str = "transactions";
    pub const GOALS: &str = "goals";
    pub const BUDGETS: &str = "budgets";
    pub const FIXED_COSTS: &str = "fixedCosts";
    pub const PROJECTS: &str = "incomeProjects";
    pub const COMPLETED_PLANS: &str = "completedPlans";
    pub const GAMIFICATION: &str = "gamification";
    pub const CATEGORIES: &str = "categories";
    pub const SETTINGS: &str = "settings";
    pub const ALLOCATION: &str = "allocationSetting";
    pub const INSIGHTS_REPORT: &str = "insightsReport";
}

/// A buffered multi-collection write, committed atomically through the
/// backend's batch primitive.
#[derive(Default)]
pub struct WriteBatch {
    entries: Vec<(String, String)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        WriteBatch::default()
    }

    fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.entries.push((key.to_string(), raw));
        Ok(())
    }

    pub fn wallets(&mut self, wallets: &[Wallet]) -> Result<&mut Self> {
        self.put(keys::WALLETS, &wallets)?;
        Ok(self)
    }

    pub fn transactions(&mut self, transactions: &[Transaction]) -> Result<&mut Self> {
        self.put(keys::TRANSACTIONS, &transactions)?;
        Ok(self)
    }

    pub fn goals(&mut self, goals: &[Goal]) -> Result<&mut Self> {
        self.put(keys::GOALS, &goals)?;
        Ok(self)
    }

    pub fn budgets(&mut self, budgets: &[Budget]) -> Result<&mut Self> {
        self.put(keys::BUDGETS, &budgets)?;
        Ok(self)
    }

    pub fn fixed_costs(&mut self, costs: &[FixedCost]) -> Result<&mut Self> {
        self.put(keys::FIXED_COSTS, &costs)?;
        Ok(self)
    }

    pub fn projects(&mut self, projects: &[IncomeProject]) -> Result<&mut Self> {
        self.put(keys::PROJECTS, &projects)?;
        Ok(self)
    }

    pub fn completed_plans(&mut self, plans: &[CompletedPlan]) -> Result<&mut Self> {
        self.put(keys::COMPLETED_PLANS, &plans)?;
        Ok(self)
    }

    pub fn gamification(&mut self, state: &GamificationState) -> Result<&mut Self> {
        self.put(keys::GAMIFICATION, state)?;
        Ok(self)
    }

    pub fn categories(&mut self, categories: &[String]) -> Result<&mut Self> {
        self.put(keys::CATEGORIES, &categories)?;
        Ok(self)
    }

    pub fn settings(&mut self, settings: &AppSettings) -> Result<&mut Self> {
        self.put(keys::SETTINGS, settings)?;
        Ok(self)
    }

    pub fn allocation_setting(&mut self, items: &[AllocationItem]) -> Result<&mut Self> {
        self.put(keys::ALLOCATION, &items)?;
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Typed load/save of every collection, with defensive sanitization on read.
pub struct EntityRepository {
    backend: Arc<dyn KvBackend>,
}

impl EntityRepository {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        EntityRepository { backend }
    }

    /// Seeds absent collections with default data in one atomic write.
    /// Idempotent: existing collections are never touched.
    pub fn init(&self) -> Result<()> {
        let mut batch = WriteBatch::new();
        if !self.backend.contains(keys::WALLETS)? {
            batch.wallets(&seed_wallets())?;
        }
        if !self.backend.contains(keys::BUDGETS)? {
            batch.budgets(&seed_budgets())?;
        }
        if !self.backend.contains(keys::CATEGORIES)? {
            batch.categories(&default_categories())?;
        }
        if !self.backend.contains(keys::GAMIFICATION)? {
            batch.gamification(&GamificationState::default())?;
        }
        if !self.backend.contains(keys::SETTINGS)? {
            batch.settings(&AppSettings::default())?;
        }
        if batch.is_empty() {
            debug!("store already seeded, nothing to do");
            return Ok(());
        }
        self.commit(batch)
    }

    /// Commits a buffered write atomically.
    pub fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.backend.set_many(&batch.entries)
    }

    // === reads (sanitized, never fail on malformed content) ===

    pub fn get_wallets(&self) -> Result<Vec<Wallet>> {
        Ok(self
            .read_array(keys::WALLETS)?
            .iter()
            .filter_map(Wallet::sanitize)
            .collect())
    }

    pub fn get_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self
            .read_array(keys::TRANSACTIONS)?
            .iter()
            .filter_map(Transaction::sanitize)
            .collect())
    }

    pub fn get_goals(&self) -> Result<Vec<Goal>> {
        Ok(self
            .read_array(keys::GOALS)?
            .iter()
            .filter_map(Goal::sanitize)
            .collect())
    }

    pub fn get_budgets(&self) -> Result<Vec<Budget>> {
        Ok(self
            .read_array(keys::BUDGETS)?
            .iter()
            .filter_map(Budget::sanitize)
            .collect())
    }

    pub fn get_fixed_costs(&self) -> Result<Vec<FixedCost>> {
        Ok(self
            .read_array(keys::FIXED_COSTS)?
            .iter()
            .filter_map(FixedCost::sanitize)
            .collect())
    }

    pub fn get_projects(&self) -> Result<Vec<IncomeProject>> {
        Ok(self
            .read_array(keys::PROJECTS)?
            .iter()
            .filter_map(IncomeProject::sanitize)
            .collect())
    }

    pub fn get_completed_plans(&self) -> Result<Vec<CompletedPlan>> {
        Ok(self
            .read_array(keys::COMPLETED_PLANS)?
            .iter()
            .filter_map(CompletedPlan::sanitize)
            .collect())
    }

    pub fn get_gamification(&self) -> Result<GamificationState> {
        Ok(GamificationState::sanitize(
            &self.read_record(keys::GAMIFICATION)?,
        ))
    }

    pub fn get_categories(&self) -> Result<Vec<String>> {
        Ok(sanitize_categories(&self.read_array(keys::CATEGORIES)?))
    }

    pub fn get_settings(&self) -> Result<AppSettings> {
        Ok(AppSettings::sanitize(&self.read_record(keys::SETTINGS)?))
    }

    pub fn get_allocation_setting(&self) -> Result<Vec<AllocationItem>> {
        Ok(self
            .read_array(keys::ALLOCATION)?
            .iter()
            .filter_map(AllocationItem::sanitize)
            .collect())
    }

    // === single-collection writes ===

    pub fn set_wallets(&self, wallets: &[Wallet]) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.wallets(wallets)?;
        self.commit(batch)
    }

    pub fn set_goals(&self, goals: &[Goal]) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.goals(goals)?;
        self.commit(batch)
    }

    pub fn set_budgets(&self, budgets: &[Budget]) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.budgets(budgets)?;
        self.commit(batch)
    }

    pub fn set_fixed_costs(&self, costs: &[FixedCost]) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.fixed_costs(costs)?;
        self.commit(batch)
    }

    pub fn set_projects(&self, projects: &[IncomeProject]) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.projects(projects)?;
        self.commit(batch)
    }

    pub fn set_categories(&self, categories: &[String]) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.categories(categories)?;
        self.commit(batch)
    }

    pub fn set_settings(&self, settings: &AppSettings) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.settings(settings)?;
        self.commit(batch)
    }

    /// Raw document access for collections without a dedicated accessor
    /// (the persisted insights report).
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        self.backend.get(key)
    }

    pub fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.backend.set(key, value)
    }

    fn read_array(&self, key: &str) -> Result<Vec<Value>> {
        match self.backend.get(key)? {
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Array(items)) => Ok(items),
                Ok(_) | Err(_) => {
                    warn!("collection '{key}' is not a JSON array, reading as empty");
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    fn read_record(&self, key: &str) -> Result<Value> {
        match self.backend.get(key)? {
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(value @ Value::Object(_)) => Ok(value),
                Ok(_) | Err(_) => {
                    warn!("record '{key}' is not a JSON object, reading defaults");
                    Ok(Value::Null)
                }
            },
            None => Ok(Value::Null),
        }
    }
}

fn seed_wallets() -> Vec<Wallet> {
    vec![
        Wallet::new("default", "Cash", 0),
        Wallet::new("default", "Bank", 0),
    ]
}

fn seed_budgets() -> Vec<Budget> {
    vec![
        Budget::new("Food & Drink", 3_000_000),
        Budget::new("Transport", 1_000_000),
        Budget::new("Entertainment", 500_000),
    ]
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod repository_tests;
