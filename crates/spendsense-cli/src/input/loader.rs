//! Strict record loader: fills defaults, validates, and builds typed
//! transactions from raw CSV/JSON records. Invalid records are skipped with
//! a warning; a dataset with no valid records at all is an error.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::{info, warn};

use spendsense_core::{Channel, Decision, RecipientStatus, Transaction};

const MAX_AMOUNT: Decimal = dec!(1_000_000);

/// A minimal dataset only needs these three columns; everything else is
/// filled with defaults.
const REQUIRED_FIELDS: [&str; 10] = [
    "txn_id",
    "user_id",
    "timestamp",
    "amount",
    "category",
    "recipient_status",
    "monthly_budget_remaining",
    "device_id",
    "location",
    "channel",
];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

#[derive(Debug)]
pub struct LoadReport {
    pub transactions: Vec<Transaction>,
    pub total: usize,
    pub skipped: usize,
}

/// Convert raw records into transactions, skipping invalid ones.
pub fn load_records(records: &[Value]) -> Result<LoadReport, Box<dyn std::error::Error>> {
    let mut transactions = Vec::new();
    let mut skipped = 0;

    for (index, record) in records.iter().enumerate() {
        let filled = fill_defaults(record, index);
        match build_transaction(&filled) {
            Some(txn) => transactions.push(txn),
            None => skipped += 1,
        }
    }

    if transactions.is_empty() {
        let columns: Vec<String> = records
            .first()
            .and_then(|r| r.as_object())
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        return Err(format!(
            "No valid transactions found. Skipped {}/{} records. Columns found: {:?}. \
             Check that 'timestamp', 'amount', and 'category' have valid values.",
            skipped,
            records.len(),
            columns
        )
        .into());
    }

    if skipped > 0 {
        warn!(skipped, total = records.len(), "skipped invalid records");
    }
    info!(loaded = transactions.len(), "loaded valid transactions");

    Ok(LoadReport {
        transactions,
        total: records.len(),
        skipped,
    })
}

/// Fill missing fields with defaults so minimal datasets work. At minimum a
/// record needs timestamp, amount, and category.
fn fill_defaults(record: &Value, index: usize) -> Map<String, Value> {
    let mut filled = record.as_object().cloned().unwrap_or_default();

    if is_empty(filled.get("txn_id")) {
        filled.insert(
            "txn_id".into(),
            Value::String(format!("TXN_{:05}", index + 1)),
        );
    }
    if is_empty(filled.get("user_id")) {
        filled.insert("user_id".into(), Value::String("USR_DEFAULT".into()));
    }
    if is_empty(filled.get("recipient_status")) {
        // Datasets labelled for training carry is_impulsive; use it as a proxy.
        let status = match filled.get("is_impulsive") {
            Some(v) => {
                let truthy = matches!(
                    as_trimmed_string(v).to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes"
                );
                if truthy { "new" } else { "existing" }
            }
            None => "existing",
        };
        filled.insert("recipient_status".into(), Value::String(status.into()));
    }
    if is_empty(filled.get("monthly_budget_remaining")) {
        // 5x the amount keeps defaults under the budget-drain threshold.
        let budget = filled
            .get("amount")
            .and_then(parse_decimal)
            .map(|a| (a * dec!(5)).max(dec!(2000)))
            .unwrap_or(dec!(2000));
        filled.insert(
            "monthly_budget_remaining".into(),
            Value::String(budget.to_string()),
        );
    }
    if is_empty(filled.get("device_id")) {
        filled.insert("device_id".into(), Value::String("DEV_DEFAULT".into()));
    }
    if is_empty(filled.get("location")) {
        filled.insert("location".into(), Value::String("Unknown".into()));
    }
    if is_empty(filled.get("channel")) {
        filled.insert("channel".into(), Value::String("web".into()));
    }

    filled
}

/// Validate a filled record and build the typed transaction. Returns None
/// (after a warning) when any field is missing or malformed.
fn build_transaction(record: &Map<String, Value>) -> Option<Transaction> {
    let txn_id = as_trimmed_string(record.get("txn_id")?);

    for field in REQUIRED_FIELDS {
        if is_empty(record.get(field)) {
            warn!(txn_id = %txn_id, field, "missing required field");
            return None;
        }
    }

    let amount = match record.get("amount").and_then(parse_decimal) {
        Some(a) if a > Decimal::ZERO && a <= MAX_AMOUNT => a,
        Some(a) => {
            warn!(txn_id = %txn_id, amount = %a, "amount out of range");
            return None;
        }
        None => {
            warn!(txn_id = %txn_id, "non-numeric amount");
            return None;
        }
    };

    let Some(budget) = record.get("monthly_budget_remaining").and_then(parse_decimal) else {
        warn!(txn_id = %txn_id, "non-numeric budget");
        return None;
    };

    let timestamp_raw = as_trimmed_string(record.get("timestamp")?);
    let Some(timestamp) = parse_timestamp(&timestamp_raw) else {
        warn!(txn_id = %txn_id, timestamp = %timestamp_raw, "invalid timestamp");
        return None;
    };

    let recipient_raw = as_trimmed_string(record.get("recipient_status")?);
    let Ok(recipient_status) = RecipientStatus::from_str(&recipient_raw) else {
        warn!(txn_id = %txn_id, value = %recipient_raw, "invalid recipient_status");
        return None;
    };

    let channel_raw = as_trimmed_string(record.get("channel")?);
    let Ok(channel) = Channel::from_str(&channel_raw) else {
        warn!(txn_id = %txn_id, value = %channel_raw, "invalid channel");
        return None;
    };

    // Optional replay column; a malformed value loses only the decision.
    let user_decision = match record.get("user_decision") {
        Some(v) if !is_empty(Some(v)) => {
            let raw = as_trimmed_string(v);
            match Decision::from_str(&raw) {
                Ok(d) => Some(d),
                Err(_) => {
                    warn!(txn_id = %txn_id, value = %raw, "ignoring invalid user_decision");
                    None
                }
            }
        }
        _ => None,
    };

    Some(Transaction {
        txn_id,
        user_id: as_trimmed_string(record.get("user_id")?),
        timestamp,
        amount,
        category: as_trimmed_string(record.get("category")?).to_lowercase(),
        recipient_status,
        monthly_budget_remaining: budget,
        device_id: as_trimmed_string(record.get("device_id")?),
        location: as_trimmed_string(record.get("location")?),
        channel,
        is_flagged: false,
        user_decision,
    })
}

/// Parse a timestamp from ISO and the handful of common formats datasets
/// actually use; date-only values land at midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

fn as_trimmed_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
