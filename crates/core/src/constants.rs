/// Categories seeded into a fresh store. The list is user-extensible and
/// append-only; see `categories`.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Food & Drink",
    "Transport",
    "Housing",
    "Utilities",
    "Health",
    "Education",
    "Entertainment",
    "Shopping",
    "Salary",
    "Investment",
    "Other",
];

/// Category recorded on goal-contribution transactions.
pub const GOAL_CONTRIBUTION_CATEGORY: &str = "Investment";

/// Category recorded on fixed-cost payment transactions.
pub const FIXED_COST_CATEGORY: &str = "Utilities";

/// Category recorded on synthetic auto-deduction transfers.
pub const AUTO_DEDUCT_CATEGORY: &str = "Savings";

/// Category recorded on wallet-to-wallet transfers.
pub const TRANSFER_CATEGORY: &str = "Transfer";

/// Category recorded when an income project's earnings are collected.
pub const PROJECT_INCOME_CATEGORY: &str = "Salary";

/// Default auto-deduction percentage for fresh settings (feature disabled
/// until the user opts in).
pub const DEFAULT_AUTO_DEDUCT_PERCENT: u8 = 10;

/// How many of the most recent transactions go into an insights snapshot.
pub const SNAPSHOT_RECENT_TRANSACTIONS: usize = 50;
