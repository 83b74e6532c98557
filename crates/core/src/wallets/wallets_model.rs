//! Wallet domain model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::utils::json_utils::{amount_field, str_field};

/// A named money container. Balances are integers in the smallest currency
/// unit and never go negative through a committed ledger operation. Balances
/// are mutated only by the ledger engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    /// Owner label supplied by the identity collaborator; not validated here.
    pub user_id: String,
    pub name: String,
    pub balance: i64,
}

impl Wallet {
    pub fn new(user_id: &str, name: &str, balance: i64) -> Self {
        Wallet {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            balance,
        }
    }

    /// Rebuilds a wallet from an untrusted stored record, coercing malformed
    /// fields to safe defaults. Records without any id are dropped by the
    /// caller rather than invented.
    pub(crate) fn sanitize(record: &Value) -> Option<Wallet> {
        let id = str_field(record, "id", "");
        if id.is_empty() {
            return None;
        }
        Some(Wallet {
            id,
            user_id: str_field(record, "userId", ""),
            name: str_field(record, "name", "Wallet"),
            balance: amount_field(record, "balance", 0).max(0),
        })
    }
}
