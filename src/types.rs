use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Raw ledger event as it arrives from the JSON export.
///
/// Upstream exports are loosely typed: `timestamp` and `actionData.amount`
/// show up as numbers in some dumps and as numeric strings in others, so the
/// flexible fields stay as `serde_json::Value` until normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    #[serde(rename = "userWallet")]
    pub user_wallet: Option<String>,
    pub action: Option<String>,
    pub timestamp: Value,
    #[serde(rename = "actionData")]
    pub action_data: Value,
}

/// The five action types that contribute features to the credit score.
/// Any other action string is kept on the transaction but not featured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Deposit,
    Borrow,
    Repay,
    RedeemUnderlying,
    LiquidationCall,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Deposit,
        Action::Borrow,
        Action::Repay,
        Action::RedeemUnderlying,
        Action::LiquidationCall,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(Action::Deposit),
            "borrow" => Some(Action::Borrow),
            "repay" => Some(Action::Repay),
            "redeemunderlying" => Some(Action::RedeemUnderlying),
            "liquidationcall" => Some(Action::LiquidationCall),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Deposit => "deposit",
            Action::Borrow => "borrow",
            Action::Repay => "repay",
            Action::RedeemUnderlying => "redeemunderlying",
            Action::LiquidationCall => "liquidationcall",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical transaction produced by normalization.
///
/// `wallet` stays `None` when the source row had no identifier; those rows
/// are aggregated together as a single unidentified group. `amount` is
/// always finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub wallet: Option<String>,
    pub action: String,
    pub amount: f64,
    pub timestamp: i64,
    pub datetime: DateTime<Utc>,
}
