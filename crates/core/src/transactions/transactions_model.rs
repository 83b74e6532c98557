//! Transaction ledger entries.

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::json_utils::{amount_field, str_field};
use crate::utils::time_utils::parse_business_date;

/// Direction of a ledger entry relative to its wallet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
    /// Debits the source wallet only. The destination credit (wallet or
    /// goal) is applied directly to the target balance without a mirrored
    /// row, so the ledger holds exactly one entry per transfer.
    Transfer,
}

impl TransactionType {
    /// Signed effect of this entry on its wallet balance.
    pub fn signed_amount(self, amount: i64) -> i64 {
        match self {
            TransactionType::Income => amount,
            TransactionType::Expense | TransactionType::Transfer => -amount,
        }
    }

    fn from_raw(raw: &str) -> TransactionType {
        match raw.trim().to_ascii_uppercase().as_str() {
            "INCOME" => TransactionType::Income,
            "TRANSFER" => TransactionType::Transfer,
            // Unknown historic values read as expenses, the conservative
            // direction for a money app.
            _ => TransactionType::Expense,
        }
    }
}

/// An immutable ledger entry. The collection is append-only: no update or
/// delete API exists, and every committed entry has already been reflected
/// in its wallet's balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Business date the money moved.
    pub date: NaiveDate,
    /// Audit timestamp, epoch milliseconds; also the ordering key.
    pub timestamp: i64,
    pub amount: i64,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub category: String,
    pub wallet_id: String,
    pub description: String,
}

/// Caller-supplied fields for a new ledger entry.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: i64,
    pub tx_type: TransactionType,
    pub category: String,
    pub wallet_id: String,
    pub description: String,
}

impl Transaction {
    /// Materializes a new entry with a timestamp-plus-random id so ids sort
    /// by creation time and do not collide within a session.
    pub(crate) fn from_new(input: NewTransaction, timestamp_millis: i64) -> Transaction {
        Transaction {
            id: next_transaction_id(timestamp_millis),
            date: input.date,
            timestamp: timestamp_millis,
            amount: input.amount,
            tx_type: input.tx_type,
            category: input.category,
            wallet_id: input.wallet_id,
            description: input.description,
        }
    }

    pub(crate) fn sanitize(record: &Value) -> Option<Transaction> {
        let id = str_field(record, "id", "");
        if id.is_empty() {
            return None;
        }
        let amount = amount_field(record, "amount", 0);
        if amount <= 0 {
            // A non-positive amount cannot have had a ledger effect; drop
            // the row instead of inventing one.
            return None;
        }
        let timestamp = amount_field(record, "timestamp", 0);
        let date = parse_business_date(&str_field(record, "date", ""))
            .unwrap_or_else(|| Utc::now().date_naive());
        Some(Transaction {
            id,
            date,
            timestamp,
            amount,
            tx_type: TransactionType::from_raw(&str_field(record, "type", "")),
            category: str_field(record, "category", "Other"),
            wallet_id: str_field(record, "walletId", ""),
            description: str_field(record, "description", ""),
        })
    }
}

fn next_transaction_id(timestamp_millis: i64) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("tx_{timestamp_millis}_{suffix:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn signed_amounts() {
        assert_eq!(TransactionType::Income.signed_amount(500), 500);
        assert_eq!(TransactionType::Expense.signed_amount(500), -500);
        assert_eq!(TransactionType::Transfer.signed_amount(500), -500);
    }

    #[test]
    fn sanitize_coerces_drifted_records() {
        let record = json!({
            "id": "tx_1",
            "date": "2025-03-05",
            "timestamp": "1741150800000",
            "amount": "250.000",
            "type": "income",
            "walletId": "w1",
        });
        let tx = Transaction::sanitize(&record).unwrap();
        assert_eq!(tx.amount, 250_000);
        assert_eq!(tx.tx_type, TransactionType::Income);
        assert_eq!(tx.timestamp, 1_741_150_800_000);
        assert_eq!(tx.category, "Other");
        assert_eq!(tx.description, "");
    }

    #[test]
    fn sanitize_drops_unusable_records() {
        assert!(Transaction::sanitize(&json!({"amount": 100})).is_none());
        assert!(Transaction::sanitize(&json!({"id": "x", "amount": 0})).is_none());
        assert!(Transaction::sanitize(&json!({"id": "x", "amount": -5})).is_none());
    }

    #[test]
    fn unknown_type_reads_as_expense() {
        let record = json!({"id": "t", "amount": 10, "type": "GIFT"});
        let tx = Transaction::sanitize(&record).unwrap();
        assert_eq!(tx.tx_type, TransactionType::Expense);
    }

    #[test]
    fn ids_sort_by_time() {
        let a = next_transaction_id(1_000);
        let b = next_transaction_id(2_000);
        assert!(a < b);
    }
}
