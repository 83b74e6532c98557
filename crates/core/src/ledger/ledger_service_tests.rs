use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{Error, LedgerError};
use crate::fixed_costs::FixedCost;
use crate::gamification::Rank;
use crate::goals::Goal;
use crate::ledger::LedgerService;
use crate::projects::{IncomeProject, Milestone, ProjectStatus};
use crate::settings::{AllocationItem, AllocationKind, AppSettings};
use crate::store::{EntityRepository, MemoryBackend};
use crate::transactions::{NewTransaction, Transaction, TransactionType};
use crate::wallets::Wallet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> (Arc<EntityRepository>, LedgerService) {
    let repo = Arc::new(EntityRepository::new(Arc::new(MemoryBackend::new())));
    repo.init().unwrap();
    (repo.clone(), LedgerService::new(repo))
}

fn wallet(repo: &EntityRepository, name: &str, balance: i64) -> String {
    let mut wallets = repo.get_wallets().unwrap();
    let w = Wallet::new("u1", name, balance);
    let id = w.id.clone();
    wallets.push(w);
    repo.set_wallets(&wallets).unwrap();
    id
}

fn income_input(wallet_id: &str, amount: i64) -> NewTransaction {
    NewTransaction {
        date: date(2025, 3, 10),
        amount,
        tx_type: TransactionType::Income,
        category: "Salary".to_string(),
        wallet_id: wallet_id.to_string(),
        description: String::new(),
    }
}

fn expense_input(wallet_id: &str, amount: i64) -> NewTransaction {
    NewTransaction {
        date: date(2025, 3, 11),
        amount,
        tx_type: TransactionType::Expense,
        category: "Food & Drink".to_string(),
        wallet_id: wallet_id.to_string(),
        description: String::new(),
    }
}

fn balance_of(repo: &EntityRepository, wallet_id: &str) -> i64 {
    repo.get_wallets()
        .unwrap()
        .into_iter()
        .find(|w| w.id == wallet_id)
        .unwrap()
        .balance
}

fn wallet_transactions(repo: &EntityRepository, wallet_id: &str) -> Vec<Transaction> {
    repo.get_transactions()
        .unwrap()
        .into_iter()
        .filter(|tx| tx.wallet_id == wallet_id)
        .collect()
}

fn enable_auto_deduct(repo: &EntityRepository, percent: u8, savings_wallet_id: &str) {
    let settings = AppSettings {
        auto_deduct_enabled: true,
        auto_deduct_percent: percent,
        savings_wallet_id: Some(savings_wallet_id.to_string()),
        tone_hint: String::new(),
    };
    repo.set_settings(&settings).unwrap();
}

// === add_transaction ===

#[test]
fn income_credits_wallet() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 1_000_000);
    let tx = ledger.add_transaction(income_input(&w1, 500_000)).unwrap();
    assert_eq!(tx.amount, 500_000);
    assert_eq!(balance_of(&repo, &w1), 1_500_000);
}

#[test]
fn expense_debits_wallet() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 1_000_000);
    ledger.add_transaction(expense_input(&w1, 400_000)).unwrap();
    assert_eq!(balance_of(&repo, &w1), 600_000);
}

#[test]
fn non_positive_amount_is_rejected() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 1_000_000);
    assert!(ledger.add_transaction(expense_input(&w1, 0)).is_err());
    assert!(ledger.add_transaction(expense_input(&w1, -10)).is_err());
    assert_eq!(balance_of(&repo, &w1), 1_000_000);
}

#[test]
fn unknown_wallet_is_rejected() {
    let (_, ledger) = setup();
    let result = ledger.add_transaction(expense_input("nope", 100));
    assert!(matches!(
        result,
        Err(Error::Ledger(LedgerError::UnknownWallet(_)))
    ));
}

#[test]
fn overdrafting_expense_is_rejected_without_mutation() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 300_000);
    let before_txs = repo.get_transactions().unwrap().len();

    let result = ledger.add_transaction(expense_input(&w1, 300_001));
    assert!(matches!(
        result,
        Err(Error::Ledger(LedgerError::InsufficientFunds { .. }))
    ));
    assert_eq!(balance_of(&repo, &w1), 300_000);
    assert_eq!(repo.get_transactions().unwrap().len(), before_txs);
}

// Scenario: income with auto-deduct enabled at 10% routes a tenth of the
// income into the savings wallet via one synthetic TRANSFER.
#[test]
fn income_auto_deducts_into_savings_wallet() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 1_000_000);
    let w2 = wallet(&repo, "W2", 0);
    enable_auto_deduct(&repo, 10, &w2);

    ledger.add_transaction(income_input(&w1, 500_000)).unwrap();

    assert_eq!(balance_of(&repo, &w1), 1_450_000);
    assert_eq!(balance_of(&repo, &w2), 50_000);

    // Two rows against W1: the INCOME and the synthetic TRANSFER.
    let w1_txs = wallet_transactions(&repo, &w1);
    assert_eq!(w1_txs.len(), 2);
    assert_eq!(w1_txs[0].tx_type, TransactionType::Income);
    assert_eq!(w1_txs[0].amount, 500_000);
    assert_eq!(w1_txs[1].tx_type, TransactionType::Transfer);
    assert_eq!(w1_txs[1].amount, 50_000);
    // The savings wallet is credited directly, with no row of its own.
    assert!(wallet_transactions(&repo, &w2).is_empty());
}

#[test]
fn auto_deduct_amount_is_floored() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 0);
    let w2 = wallet(&repo, "W2", 0);
    enable_auto_deduct(&repo, 7, &w2);

    // floor(12345 * 7 / 100) = 864
    ledger.add_transaction(income_input(&w1, 12_345)).unwrap();
    assert_eq!(balance_of(&repo, &w2), 864);
    assert_eq!(balance_of(&repo, &w1), 12_345 - 864);
}

#[test]
fn auto_deduct_skipped_when_disabled_or_unconfigured() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 0);
    let w2 = wallet(&repo, "W2", 0);

    // Disabled.
    ledger.add_transaction(income_input(&w1, 100_000)).unwrap();
    assert_eq!(balance_of(&repo, &w2), 0);

    // Enabled but the savings wallet points at the income wallet itself.
    enable_auto_deduct(&repo, 10, &w1);
    ledger.add_transaction(income_input(&w1, 100_000)).unwrap();
    assert_eq!(balance_of(&repo, &w1), 200_000);
    assert_eq!(wallet_transactions(&repo, &w1).len(), 2); // both INCOME rows only

    // Enabled but the savings wallet no longer exists.
    enable_auto_deduct(&repo, 10, "gone");
    ledger.add_transaction(income_input(&w1, 100_000)).unwrap();
    assert_eq!(balance_of(&repo, &w1), 300_000);
}

#[test]
fn expense_never_triggers_auto_deduct() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 1_000_000);
    let w2 = wallet(&repo, "W2", 0);
    enable_auto_deduct(&repo, 10, &w2);

    ledger.add_transaction(expense_input(&w1, 100_000)).unwrap();
    assert_eq!(balance_of(&repo, &w2), 0);
    assert_eq!(wallet_transactions(&repo, &w1).len(), 1);
}

// === transfer_funds ===

#[test]
fn transfer_moves_money_and_records_one_row() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 800_000);
    let w2 = wallet(&repo, "W2", 100_000);

    assert!(ledger.transfer_funds(&w1, &w2, 300_000, "monthly move").unwrap());
    assert_eq!(balance_of(&repo, &w1), 500_000);
    assert_eq!(balance_of(&repo, &w2), 400_000);

    let rows = wallet_transactions(&repo, &w1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tx_type, TransactionType::Transfer);
    assert_eq!(rows[0].description, "monthly move");
    assert!(wallet_transactions(&repo, &w2).is_empty());
}

#[test]
fn transfer_of_entire_balance_leaves_exactly_zero() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 800_000);
    let w2 = wallet(&repo, "W2", 0);
    assert!(ledger.transfer_funds(&w1, &w2, 800_000, "").unwrap());
    assert_eq!(balance_of(&repo, &w1), 0);
    assert_eq!(balance_of(&repo, &w2), 800_000);
}

#[test]
fn transfer_exceeding_balance_fails_without_mutation() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 800_000);
    let w2 = wallet(&repo, "W2", 50_000);
    let before_txs = repo.get_transactions().unwrap().len();

    assert!(!ledger.transfer_funds(&w1, &w2, 800_001, "").unwrap());
    assert_eq!(balance_of(&repo, &w1), 800_000);
    assert_eq!(balance_of(&repo, &w2), 50_000);
    assert_eq!(repo.get_transactions().unwrap().len(), before_txs);
}

#[test]
fn transfer_validates_inputs() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 800_000);
    assert!(ledger.transfer_funds(&w1, &w1, 100, "").is_err());
    assert!(ledger.transfer_funds(&w1, "nope", 100, "").is_err());
    assert!(ledger.transfer_funds(&w1, "other", 0, "").is_err());
}

// === contribute_to_goal ===

fn goal(repo: &EntityRepository, target: i64) -> String {
    let g = Goal::new("Laptop", target, None);
    let id = g.id.clone();
    repo.set_goals(&[g]).unwrap();
    id
}

#[test]
fn contribution_debits_wallet_and_credits_goal() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 500_000);
    let g1 = goal(&repo, 1_000_000);

    assert!(ledger
        .contribute_to_goal(&g1, &w1, 300_000, "first round", "u1")
        .unwrap());

    assert_eq!(balance_of(&repo, &w1), 200_000);
    let goals = repo.get_goals().unwrap();
    assert_eq!(goals[0].current_amount, 300_000);
    assert_eq!(goals[0].rounds.len(), 1);
    assert_eq!(goals[0].rounds[0].amount, 300_000);
    assert_eq!(goals[0].rounds[0].contributor_id, "u1");
    assert_eq!(goals[0].current_amount, goals[0].contributed_total());

    let rows = wallet_transactions(&repo, &w1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tx_type, TransactionType::Transfer);
    assert_eq!(rows[0].category, "Investment");
}

// Scenario: contributing more than the wallet holds fails and changes
// nothing.
#[test]
fn underfunded_contribution_fails_without_mutation() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 200_000);
    let g1 = goal(&repo, 1_000_000);

    assert!(!ledger
        .contribute_to_goal(&g1, &w1, 300_000, "note", "u1")
        .unwrap());

    assert_eq!(balance_of(&repo, &w1), 200_000);
    let goals = repo.get_goals().unwrap();
    assert_eq!(goals[0].current_amount, 0);
    assert!(goals[0].rounds.is_empty());
}

#[test]
fn contribution_validates_references() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 500_000);
    let g1 = goal(&repo, 1_000_000);
    assert!(matches!(
        ledger.contribute_to_goal("nope", &w1, 100, "", "u1"),
        Err(Error::Ledger(LedgerError::UnknownGoal(_)))
    ));
    assert!(matches!(
        ledger.contribute_to_goal(&g1, "nope", 100, "", "u1"),
        Err(Error::Ledger(LedgerError::UnknownWallet(_)))
    ));
    assert!(ledger.contribute_to_goal(&g1, &w1, 0, "", "u1").is_err());
}

// === pay_fixed_cost ===

fn fixed_cost(repo: &EntityRepository, amount: i64, due: NaiveDate, months: u32) -> String {
    let mut cost = FixedCost::new("Rent", amount, due, months);
    cost.allocated_amount = 1_000_000;
    let id = cost.id.clone();
    repo.set_fixed_costs(&[cost]).unwrap();
    id
}

// Scenario: paying a monthly bill advances the due date one month, resets
// the saved-up amount, and records the expense.
#[test]
fn paying_fixed_cost_advances_due_date_and_resets_allocation() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 10_000_000);
    let c1 = fixed_cost(&repo, 8_000_000, date(2025, 1, 20), 1);

    let updated = ledger.pay_fixed_cost(&c1, &w1).unwrap();
    assert_eq!(updated.next_due_date, date(2025, 2, 20));
    assert_eq!(updated.allocated_amount, 0);

    assert_eq!(balance_of(&repo, &w1), 2_000_000);
    let rows = wallet_transactions(&repo, &w1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tx_type, TransactionType::Expense);
    assert_eq!(rows[0].amount, 8_000_000);
    assert_eq!(repo.get_fixed_costs().unwrap()[0], updated);
}

#[test]
fn paying_fixed_cost_rolls_over_year_boundaries() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 10_000_000);
    let c1 = fixed_cost(&repo, 1_000_000, date(2025, 11, 30), 3);

    let updated = ledger.pay_fixed_cost(&c1, &w1).unwrap();
    assert_eq!(updated.next_due_date, date(2026, 2, 28));
}

#[test]
fn paying_fixed_cost_requires_funds_and_known_ids() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 100);
    let c1 = fixed_cost(&repo, 8_000_000, date(2025, 1, 20), 1);

    assert!(matches!(
        ledger.pay_fixed_cost(&c1, &w1),
        Err(Error::Ledger(LedgerError::InsufficientFunds { .. }))
    ));
    // Nothing changed.
    assert_eq!(balance_of(&repo, &w1), 100);
    assert_eq!(repo.get_fixed_costs().unwrap()[0].allocated_amount, 1_000_000);

    assert!(matches!(
        ledger.pay_fixed_cost("nope", &w1),
        Err(Error::Ledger(LedgerError::UnknownFixedCost(_)))
    ));
    assert!(matches!(
        ledger.pay_fixed_cost(&c1, "nope"),
        Err(Error::Ledger(LedgerError::UnknownWallet(_)))
    ));
}

// === execute_allocation ===

fn allocation_item(item_id: &str, kind: AllocationKind, percentage: u8) -> AllocationItem {
    AllocationItem {
        item_id: item_id.to_string(),
        kind,
        percentage,
        is_enabled: true,
    }
}

#[test]
fn allocation_splits_between_goal_and_cost() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 2_000_000);
    let g1 = goal(&repo, 5_000_000);
    let c1 = fixed_cost(&repo, 8_000_000, date(2025, 6, 1), 1);
    let items = vec![
        allocation_item(&g1, AllocationKind::Goal, 50),
        allocation_item(&c1, AllocationKind::Cost, 30),
    ];

    assert!(ledger.execute_allocation(1_000_000, &w1, &items).unwrap());

    // Only the goal share moves real money.
    assert_eq!(balance_of(&repo, &w1), 1_500_000);
    assert_eq!(repo.get_goals().unwrap()[0].current_amount, 500_000);
    assert_eq!(
        repo.get_fixed_costs().unwrap()[0].allocated_amount,
        1_000_000 + 300_000
    );
    // The split is saved as the new default.
    assert_eq!(repo.get_allocation_setting().unwrap(), items);
}

// Scenario: the goal share alone exceeding the balance fails the whole
// operation with no mutation anywhere.
#[test]
fn allocation_fails_entirely_when_goal_share_exceeds_balance() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 400_000);
    let g1 = goal(&repo, 5_000_000);
    let c1 = fixed_cost(&repo, 8_000_000, date(2025, 6, 1), 1);
    let items = vec![
        allocation_item(&g1, AllocationKind::Goal, 50),
        allocation_item(&c1, AllocationKind::Cost, 50),
    ];

    assert!(!ledger.execute_allocation(1_000_000, &w1, &items).unwrap());

    assert_eq!(balance_of(&repo, &w1), 400_000);
    assert_eq!(repo.get_goals().unwrap()[0].current_amount, 0);
    assert_eq!(repo.get_fixed_costs().unwrap()[0].allocated_amount, 1_000_000);
    assert!(repo.get_allocation_setting().unwrap().is_empty());
}

#[test]
fn allocation_ignores_disabled_and_zero_percent_items() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 2_000_000);
    let g1 = goal(&repo, 5_000_000);
    let mut disabled = allocation_item(&g1, AllocationKind::Goal, 80);
    disabled.is_enabled = false;
    let items = vec![disabled, allocation_item(&g1, AllocationKind::Goal, 0)];

    assert!(ledger.execute_allocation(1_000_000, &w1, &items).unwrap());
    assert_eq!(balance_of(&repo, &w1), 2_000_000);
    assert_eq!(repo.get_goals().unwrap()[0].current_amount, 0);
}

#[test]
fn allocation_rejects_unknown_item_ids_before_mutating() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 2_000_000);
    let g1 = goal(&repo, 5_000_000);
    let items = vec![
        allocation_item(&g1, AllocationKind::Goal, 20),
        allocation_item("nope", AllocationKind::Cost, 20),
    ];

    assert!(matches!(
        ledger.execute_allocation(1_000_000, &w1, &items),
        Err(Error::Ledger(LedgerError::UnknownFixedCost(_)))
    ));
    assert_eq!(balance_of(&repo, &w1), 2_000_000);
    assert_eq!(repo.get_goals().unwrap()[0].current_amount, 0);
}

// === collect_project_income ===

fn project(repo: &EntityRepository, expected_income: i64, end: Option<NaiveDate>) -> String {
    let mut p = IncomeProject::new("Freelance site", expected_income);
    p.end_date = end;
    p.milestones = (0..3)
        .map(|i| Milestone {
            id: Uuid::new_v4().to_string(),
            title: format!("step {i}"),
            due_date: None,
            is_completed: true,
        })
        .collect();
    let id = p.id.clone();
    repo.set_projects(&[p]).unwrap();
    id
}

// Scenario: a three-milestone 10,000,000 project collected on time earns
// floor((1000 + 150) * 1.2) = 1380 points and a real income transaction.
#[test]
fn collecting_project_income_credits_wallet_and_awards_points() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 0);
    let p1 = project(&repo, 10_000_000, Some(date(2025, 6, 30)));

    let result = ledger
        .collect_project_income(&p1, &w1, date(2025, 6, 15))
        .unwrap();

    assert_eq!(result.points_awarded, 1_380);
    assert_eq!(result.rank, Rank::Iron);
    assert_eq!(balance_of(&repo, &w1), 10_000_000);

    let rows = wallet_transactions(&repo, &w1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tx_type, TransactionType::Income);
    assert_eq!(rows[0].amount, 10_000_000);

    let projects = repo.get_projects().unwrap();
    assert!(projects[0].collected);
    assert_eq!(projects[0].status, ProjectStatus::Completed);

    let plans = repo.get_completed_plans().unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].earned_amount, 10_000_000);
    assert_eq!(plans[0].points_awarded, 1_380);

    assert_eq!(repo.get_gamification().unwrap().points, 1_380);
}

#[test]
fn late_collection_skips_the_multiplier() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 0);
    let p1 = project(&repo, 10_000_000, Some(date(2025, 6, 30)));

    let result = ledger
        .collect_project_income(&p1, &w1, date(2025, 7, 1))
        .unwrap();
    assert_eq!(result.points_awarded, 1_150);
}

#[test]
fn project_income_is_auto_deducted_like_any_income() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 0);
    let w2 = wallet(&repo, "W2", 0);
    enable_auto_deduct(&repo, 10, &w2);
    let p1 = project(&repo, 10_000_000, None);

    ledger
        .collect_project_income(&p1, &w1, date(2025, 6, 15))
        .unwrap();
    assert_eq!(balance_of(&repo, &w1), 9_000_000);
    assert_eq!(balance_of(&repo, &w2), 1_000_000);
}

#[test]
fn collecting_twice_is_rejected() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 0);
    let p1 = project(&repo, 10_000_000, None);

    ledger
        .collect_project_income(&p1, &w1, date(2025, 6, 15))
        .unwrap();
    let again = ledger.collect_project_income(&p1, &w1, date(2025, 6, 16));
    assert!(matches!(
        again,
        Err(Error::Ledger(LedgerError::ProjectAlreadyCollected(_)))
    ));
    assert_eq!(balance_of(&repo, &w1), 10_000_000);
    assert_eq!(repo.get_completed_plans().unwrap().len(), 1);
}

#[test]
fn collecting_unknown_project_or_wallet_is_rejected() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 0);
    let p1 = project(&repo, 10_000_000, None);

    assert!(matches!(
        ledger.collect_project_income("nope", &w1, date(2025, 6, 15)),
        Err(Error::Ledger(LedgerError::UnknownProject(_)))
    ));
    assert!(matches!(
        ledger.collect_project_income(&p1, "nope", date(2025, 6, 15)),
        Err(Error::Ledger(LedgerError::UnknownWallet(_)))
    ));
}

// === wallet-balance invariant ===

#[test]
fn balances_reconcile_with_signed_transaction_effects() {
    let (repo, ledger) = setup();
    let w1 = wallet(&repo, "W1", 1_000_000);
    let w2 = wallet(&repo, "W2", 0);
    let g1 = goal(&repo, 10_000_000);
    enable_auto_deduct(&repo, 10, &w2);

    ledger.add_transaction(income_input(&w1, 500_000)).unwrap();
    ledger.add_transaction(expense_input(&w1, 120_000)).unwrap();
    ledger.transfer_funds(&w1, &w2, 200_000, "").unwrap();
    ledger
        .contribute_to_goal(&g1, &w1, 100_000, "", "u1")
        .unwrap();

    // W1 started at 1,000,000; every row against it carries its signed
    // effect, auto-deduct and contribution debits included.
    let ledger_effect: i64 = wallet_transactions(&repo, &w1)
        .iter()
        .map(|tx| tx.tx_type.signed_amount(tx.amount))
        .sum();
    assert_eq!(balance_of(&repo, &w1), 1_000_000 + ledger_effect);

    // W2 received only direct credits: 50,000 auto-deduct + 200,000 transfer.
    assert_eq!(balance_of(&repo, &w2), 250_000);

    let goals = repo.get_goals().unwrap();
    assert_eq!(goals[0].current_amount, goals[0].contributed_total());
}
