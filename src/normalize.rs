use chrono::DateTime;
use serde_json::Value;

use crate::types::{RawEvent, Transaction};

/// Fixed-point scale for on-chain token amounts (18 decimals).
const WEI_SCALE: f64 = 1e18;

/// Map raw events onto canonical transactions, one-to-one and in order.
///
/// Normalization never drops a record: malformed amounts and timestamps
/// coerce to 0 so one bad row cannot abort a scoring run.
pub fn normalize(events: &[RawEvent]) -> Vec<Transaction> {
    events.iter().map(normalize_event).collect()
}

fn normalize_event(event: &RawEvent) -> Transaction {
    let action = event
        .action
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    let timestamp = coerce_timestamp(&event.timestamp);
    let amount = coerce_amount(&event.action_data);

    Transaction {
        wallet: event.user_wallet.clone(),
        action,
        amount,
        timestamp,
        datetime: DateTime::from_timestamp(timestamp, 0).unwrap_or_default(),
    }
}

/// Unix seconds from a loosely typed field. Missing and non-numeric values
/// both coerce to 0.
fn coerce_timestamp(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .or_else(|_| s.trim().parse::<f64>().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Token amount in whole units from `actionData.amount`, scaled down from
/// 18-decimal fixed point. Anything that does not parse to a finite
/// non-negative number lands as 0.
fn coerce_amount(action_data: &Value) -> f64 {
    let raw = match action_data.get("amount") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match raw {
        Some(v) => {
            let scaled = v / WEI_SCALE;
            if scaled.is_finite() && scaled >= 0.0 {
                scaled
            } else {
                tracing::trace!(raw = %v, "Non-finite or negative amount, coercing to 0");
                0.0
            }
        }
        None => 0.0,
    }
}
