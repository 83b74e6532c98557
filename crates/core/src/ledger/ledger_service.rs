//! The ledger engine: every balance-affecting mutation.
//!
//! Every operation follows the same shape: load the collections it touches,
//! compute and validate in memory, then commit all changed collections in a
//! single atomic batch. No intermediate state is ever persisted, so a crash
//! between sub-steps cannot leave a debited wallet without its transaction
//! row.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::debug;

use crate::constants::{
    AUTO_DEDUCT_CATEGORY, GOAL_CONTRIBUTION_CATEGORY, PROJECT_INCOME_CATEGORY, TRANSFER_CATEGORY,
};
use crate::errors::{Error, LedgerError, Result, ValidationError};
use crate::fixed_costs::FixedCost;
use crate::gamification::{award_points, AwardResult, CompletedPlan, Rank, RankChange};
use crate::goals::{Goal, GoalRound};
use crate::projects::ProjectStatus;
use crate::settings::{AllocationItem, AllocationKind, AppSettings};
use crate::store::{EntityRepository, WriteBatch};
use crate::transactions::{NewTransaction, Transaction, TransactionType};
use crate::utils::time_utils::add_months;
use crate::wallets::Wallet;

/// All balance-affecting mutations. Guards the wallet-balance invariant:
/// committed balances always equal the seed balance plus the signed effects
/// of every committed transaction touching the wallet, including synthetic
/// auto-deduct transfers and direct destination credits.
pub struct LedgerService {
    repository: Arc<EntityRepository>,
}

impl LedgerService {
    pub fn new(repository: Arc<EntityRepository>) -> Self {
        LedgerService { repository }
    }

    /// Appends a transaction and applies its balance effect.
    ///
    /// INCOME triggers the auto-deduction side effect when configured: one
    /// synthetic TRANSFER from the income wallet plus a direct credit to
    /// the savings wallet. EXPENSE and TRANSFER may not overdraw the wallet.
    pub fn add_transaction(&self, input: NewTransaction) -> Result<Transaction> {
        let mut wallets = self.repository.get_wallets()?;
        let mut transactions = self.repository.get_transactions()?;
        let settings = self.repository.get_settings()?;

        let tx = apply_transaction(&mut wallets, &mut transactions, &settings, input)?;

        let mut batch = WriteBatch::new();
        batch.wallets(&wallets)?;
        batch.transactions(&transactions)?;
        self.repository.commit(batch)?;
        Ok(tx)
    }

    /// Moves money between two wallets. Returns `Ok(false)` without any
    /// mutation when the source balance is insufficient.
    pub fn transfer_funds(
        &self,
        from_wallet_id: &str,
        to_wallet_id: &str,
        amount: i64,
        note: &str,
    ) -> Result<bool> {
        if amount <= 0 {
            return Err(ValidationError::NonPositiveAmount(amount).into());
        }
        if from_wallet_id == to_wallet_id {
            return Err(ValidationError::InvalidInput(
                "transfer source and destination are the same wallet".to_string(),
            )
            .into());
        }
        let mut wallets = self.repository.get_wallets()?;
        let mut transactions = self.repository.get_transactions()?;
        let from = wallet_index(&wallets, from_wallet_id)?;
        let to = wallet_index(&wallets, to_wallet_id)?;
        if wallets[from].balance < amount {
            debug!("transfer of {amount} from '{from_wallet_id}' declined, insufficient funds");
            return Ok(false);
        }

        let now = Utc::now();
        wallets[from].balance -= amount;
        wallets[to].balance += amount;
        // One debit-only row against the source; the destination credit is
        // applied to the balance directly.
        transactions.push(Transaction::from_new(
            NewTransaction {
                date: now.date_naive(),
                amount,
                tx_type: TransactionType::Transfer,
                category: TRANSFER_CATEGORY.to_string(),
                wallet_id: from_wallet_id.to_string(),
                description: note.to_string(),
            },
            now.timestamp_millis(),
        ));

        let mut batch = WriteBatch::new();
        batch.wallets(&wallets)?;
        batch.transactions(&transactions)?;
        self.repository.commit(batch)?;
        Ok(true)
    }

    /// Contributes from a wallet to a goal: debit, goal credit, appended
    /// round, and one TRANSFER row, all committed together. Returns
    /// `Ok(false)` without mutation when the wallet balance is insufficient.
    pub fn contribute_to_goal(
        &self,
        goal_id: &str,
        wallet_id: &str,
        amount: i64,
        note: &str,
        contributor_id: &str,
    ) -> Result<bool> {
        if amount <= 0 {
            return Err(ValidationError::NonPositiveAmount(amount).into());
        }
        let mut wallets = self.repository.get_wallets()?;
        let mut goals = self.repository.get_goals()?;
        let mut transactions = self.repository.get_transactions()?;
        let wallet = wallet_index(&wallets, wallet_id)?;
        let goal = goal_index(&goals, goal_id)?;
        if wallets[wallet].balance < amount {
            debug!("contribution of {amount} to goal '{goal_id}' declined, insufficient funds");
            return Ok(false);
        }

        let now = Utc::now();
        record_contribution(
            &mut wallets[wallet],
            &mut goals[goal],
            &mut transactions,
            amount,
            note,
            contributor_id,
            now.date_naive(),
            now.timestamp_millis(),
        );

        let mut batch = WriteBatch::new();
        batch.wallets(&wallets)?;
        batch.goals(&goals)?;
        batch.transactions(&transactions)?;
        self.repository.commit(batch)?;
        Ok(true)
    }

    /// Pays a fixed cost from a wallet: one EXPENSE row for the full bill
    /// amount, the saved-up `allocated_amount` reset, and the due date
    /// advanced by the billing cycle.
    pub fn pay_fixed_cost(&self, cost_id: &str, wallet_id: &str) -> Result<FixedCost> {
        let mut wallets = self.repository.get_wallets()?;
        let mut transactions = self.repository.get_transactions()?;
        let mut costs = self.repository.get_fixed_costs()?;
        let settings = self.repository.get_settings()?;
        let cost_idx = costs
            .iter()
            .position(|c| c.id == cost_id)
            .ok_or_else(|| Error::Ledger(LedgerError::UnknownFixedCost(cost_id.to_string())))?;

        let (title, amount) = (costs[cost_idx].title.clone(), costs[cost_idx].amount);
        apply_transaction(
            &mut wallets,
            &mut transactions,
            &settings,
            NewTransaction {
                date: Utc::now().date_naive(),
                amount,
                tx_type: TransactionType::Expense,
                category: crate::constants::FIXED_COST_CATEGORY.to_string(),
                wallet_id: wallet_id.to_string(),
                description: title,
            },
        )?;

        let cost = &mut costs[cost_idx];
        cost.allocated_amount = 0;
        cost.next_due_date = add_months(cost.next_due_date, cost.frequency_months);
        let updated = cost.clone();

        let mut batch = WriteBatch::new();
        batch.wallets(&wallets)?;
        batch.transactions(&transactions)?;
        batch.fixed_costs(&costs)?;
        self.repository.commit(batch)?;
        Ok(updated)
    }

    /// Splits a lump sum across goals (real money) and fixed costs (virtual
    /// bookkeeping) by percentage, then saves the split as the new default.
    ///
    /// The whole operation validates before mutating: if the sum of
    /// GOAL-type amounts exceeds the source balance, `Ok(false)` is
    /// returned and nothing changes, the saved split included.
    pub fn execute_allocation(
        &self,
        source_amount: i64,
        source_wallet_id: &str,
        items: &[AllocationItem],
    ) -> Result<bool> {
        if source_amount <= 0 {
            return Err(ValidationError::NonPositiveAmount(source_amount).into());
        }
        let mut wallets = self.repository.get_wallets()?;
        let mut goals = self.repository.get_goals()?;
        let mut costs = self.repository.get_fixed_costs()?;
        let mut transactions = self.repository.get_transactions()?;
        let wallet = wallet_index(&wallets, source_wallet_id)?;

        // Resolve every enabled item before touching anything.
        let mut goal_shares: Vec<(usize, i64)> = Vec::new();
        let mut cost_shares: Vec<(usize, i64)> = Vec::new();
        for item in items.iter().filter(|i| i.is_enabled && i.percentage > 0) {
            let share = source_amount * i64::from(item.percentage) / 100;
            if share == 0 {
                continue;
            }
            match item.kind {
                AllocationKind::Goal => {
                    goal_shares.push((goal_index(&goals, &item.item_id)?, share));
                }
                AllocationKind::Cost => {
                    let idx = costs.iter().position(|c| c.id == item.item_id).ok_or_else(|| {
                        Error::Ledger(LedgerError::UnknownFixedCost(item.item_id.clone()))
                    })?;
                    cost_shares.push((idx, share));
                }
            }
        }

        let goal_total: i64 = goal_shares.iter().map(|(_, share)| share).sum();
        if goal_total > wallets[wallet].balance {
            debug!(
                "allocation declined: goal share {goal_total} exceeds balance {}",
                wallets[wallet].balance
            );
            return Ok(false);
        }

        let now = Utc::now();
        for (goal, share) in goal_shares {
            record_contribution(
                &mut wallets[wallet],
                &mut goals[goal],
                &mut transactions,
                share,
                "Allocation",
                "",
                now.date_naive(),
                now.timestamp_millis(),
            );
        }
        for (idx, share) in cost_shares {
            costs[idx].allocated_amount += share;
        }

        let mut batch = WriteBatch::new();
        batch.wallets(&wallets)?;
        batch.goals(&goals)?;
        batch.fixed_costs(&costs)?;
        batch.transactions(&transactions)?;
        batch.allocation_setting(items)?;
        self.repository.commit(batch)?;
        Ok(true)
    }

    /// Collects a finished income project: one INCOME transaction for the
    /// expected income (auto-deduction applies), the project marked
    /// collected, and gamification points awarded, all in one batch.
    pub fn collect_project_income(
        &self,
        project_id: &str,
        wallet_id: &str,
        today: NaiveDate,
    ) -> Result<AwardResult> {
        let mut wallets = self.repository.get_wallets()?;
        let mut transactions = self.repository.get_transactions()?;
        let mut projects = self.repository.get_projects()?;
        let mut plans = self.repository.get_completed_plans()?;
        let mut state = self.repository.get_gamification()?;
        let settings = self.repository.get_settings()?;

        let idx = projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or_else(|| Error::Ledger(LedgerError::UnknownProject(project_id.to_string())))?;
        if projects[idx].collected {
            return Err(LedgerError::ProjectAlreadyCollected(project_id.to_string()).into());
        }

        let earned = projects[idx].expected_income;
        if earned > 0 {
            apply_transaction(
                &mut wallets,
                &mut transactions,
                &settings,
                NewTransaction {
                    date: today,
                    amount: earned,
                    tx_type: TransactionType::Income,
                    category: PROJECT_INCOME_CATEGORY.to_string(),
                    wallet_id: wallet_id.to_string(),
                    description: projects[idx].name.clone(),
                },
            )?;
        } else {
            // Nothing to credit, but the wallet must still be real.
            wallet_index(&wallets, wallet_id)?;
        }

        let points = award_points(&projects[idx], today);
        let old_rank = state.rank;
        state.points += points;
        state.rank = Rank::for_points(state.points);
        state.last_updated = Utc::now().timestamp_millis();

        let plan = CompletedPlan {
            id: uuid::Uuid::new_v4().to_string(),
            project_id: projects[idx].id.clone(),
            name: projects[idx].name.clone(),
            earned_amount: earned,
            completed_at: today,
            points_awarded: points,
        };
        plans.push(plan.clone());

        projects[idx].collected = true;
        projects[idx].status = ProjectStatus::Completed;

        let mut batch = WriteBatch::new();
        batch.wallets(&wallets)?;
        batch.transactions(&transactions)?;
        batch.projects(&projects)?;
        batch.completed_plans(&plans)?;
        batch.gamification(&state)?;
        self.repository.commit(batch)?;

        Ok(AwardResult {
            points_awarded: points,
            total_points: state.points,
            rank: state.rank,
            rank_change: (state.rank != old_rank).then_some(RankChange {
                from: old_rank,
                to: state.rank,
            }),
            plan,
        })
    }
}

fn wallet_index(wallets: &[Wallet], id: &str) -> Result<usize> {
    wallets
        .iter()
        .position(|w| w.id == id)
        .ok_or_else(|| Error::Ledger(LedgerError::UnknownWallet(id.to_string())))
}

fn goal_index(goals: &[Goal], id: &str) -> Result<usize> {
    goals
        .iter()
        .position(|g| g.id == id)
        .ok_or_else(|| Error::Ledger(LedgerError::UnknownGoal(id.to_string())))
}

/// Applies a funds-checked contribution to the in-memory collections:
/// wallet debit, goal credit, appended round, and one TRANSFER row. The
/// caller has already verified the balance covers `amount`.
#[allow(clippy::too_many_arguments)]
fn record_contribution(
    wallet: &mut Wallet,
    goal: &mut Goal,
    transactions: &mut Vec<Transaction>,
    amount: i64,
    note: &str,
    contributor_id: &str,
    date: NaiveDate,
    timestamp_millis: i64,
) {
    wallet.balance -= amount;
    goal.current_amount += amount;
    goal.rounds
        .push(GoalRound::new(date, amount, contributor_id, note));
    transactions.push(Transaction::from_new(
        NewTransaction {
            date,
            amount,
            tx_type: TransactionType::Transfer,
            category: GOAL_CONTRIBUTION_CATEGORY.to_string(),
            wallet_id: wallet.id.clone(),
            description: note.to_string(),
        },
        timestamp_millis,
    ));
}

/// Applies one transaction to the in-memory collections: validation, the
/// primary balance effect, and at most one secondary effect (the
/// auto-deduction for INCOME). The secondary transfer is synthesized inline
/// rather than by re-entering this function, so termination is structural:
/// there is no path from the synthetic TRANSFER back here.
fn apply_transaction(
    wallets: &mut [Wallet],
    transactions: &mut Vec<Transaction>,
    settings: &AppSettings,
    input: NewTransaction,
) -> Result<Transaction> {
    if input.amount <= 0 {
        return Err(ValidationError::NonPositiveAmount(input.amount).into());
    }
    let idx = wallet_index(wallets, &input.wallet_id)?;
    let delta = input.tx_type.signed_amount(input.amount);
    if delta < 0 && wallets[idx].balance < input.amount {
        return Err(Error::Ledger(LedgerError::InsufficientFunds {
            wallet_id: input.wallet_id,
            balance: wallets[idx].balance,
            required: input.amount,
        }));
    }

    let now = Utc::now().timestamp_millis();
    let tx = Transaction::from_new(input, now);
    wallets[idx].balance += delta;
    transactions.push(tx.clone());

    if tx.tx_type == TransactionType::Income {
        if let Some((savings_idx, deduction)) = auto_deduction(&tx, settings, wallets) {
            debug!(
                "auto-deducting {deduction} from '{}' to savings wallet",
                tx.wallet_id
            );
            wallets[idx].balance -= deduction;
            // Direct credit: the destination gets no transaction row.
            wallets[savings_idx].balance += deduction;
            transactions.push(Transaction::from_new(
                NewTransaction {
                    date: tx.date,
                    amount: deduction,
                    tx_type: TransactionType::Transfer,
                    category: AUTO_DEDUCT_CATEGORY.to_string(),
                    wallet_id: tx.wallet_id.clone(),
                    description: format!(
                        "Auto-deduct {}% of income to savings",
                        settings.auto_deduct_percent
                    ),
                },
                now,
            ));
        }
    }
    Ok(tx)
}

/// Decides whether an INCOME transaction triggers the auto-deduction, and
/// with which savings wallet and amount. `None` when the feature is off,
/// unconfigured, pointed at the income wallet itself, or rounds to zero.
fn auto_deduction(
    tx: &Transaction,
    settings: &AppSettings,
    wallets: &[Wallet],
) -> Option<(usize, i64)> {
    if !settings.auto_deduct_enabled || settings.auto_deduct_percent == 0 {
        return None;
    }
    let savings_id = settings.savings_wallet_id.as_deref()?;
    if savings_id == tx.wallet_id {
        return None;
    }
    let savings_idx = wallets.iter().position(|w| w.id == savings_id)?;
    let deduction = tx.amount * i64::from(settings.auto_deduct_percent) / 100;
    if deduction == 0 {
        return None;
    }
    Some((savings_idx, deduction))
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod ledger_service_tests;
