//! Feature engineering for the anomaly scorer.
//!
//! Every transaction becomes a fixed-order numeric vector; the scorer
//! standardizes these over the training batch. All statistical math runs in
//! f64; amounts are converted from Decimal at this boundary only.

use chrono::{Datelike, Timelike};
use rust_decimal::prelude::ToPrimitive;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::{is_discretionary, Transaction};

/// Number of numeric features per transaction.
pub const FEATURE_COUNT: usize = 7;

/// Rolling same-category window, in transactions.
const ROLLING_WINDOW: usize = 7;

/// One engineered feature row, in the same position as its source
/// transaction in the input batch.
#[derive(Debug, Clone)]
pub struct FeatureRow {
    pub txn_id: String,
    /// [amount, amount², hour, day-of-week, late-night, discretionary, rolling spend]
    pub values: [f64; FEATURE_COUNT],
    pub amount: f64,
    pub is_late_night: bool,
    pub is_discretionary: bool,
}

/// Engineer feature rows for a batch.
///
/// The rolling same-category spend is computed in timestamp order over the
/// last [`ROLLING_WINDOW`] transactions of that category (current included),
/// then mapped back to input order.
pub fn engineer(batch: &[Transaction], impulsive_hours: &HashSet<u32>) -> Vec<FeatureRow> {
    let mut order: Vec<usize> = (0..batch.len()).collect();
    order.sort_by_key(|&i| batch[i].timestamp);

    let mut rolling = vec![0.0_f64; batch.len()];
    let mut windows: HashMap<&str, VecDeque<f64>> = HashMap::new();
    for &i in &order {
        let txn = &batch[i];
        let amount = decimal_to_f64(txn);
        let window = windows.entry(txn.category.as_str()).or_default();
        window.push_back(amount);
        if window.len() > ROLLING_WINDOW {
            window.pop_front();
        }
        rolling[i] = window.iter().sum();
    }

    batch
        .iter()
        .enumerate()
        .map(|(i, txn)| {
            let amount = decimal_to_f64(txn);
            let hour = txn.timestamp.hour();
            let late_night = impulsive_hours.contains(&hour);
            let discretionary = is_discretionary(&txn.category);
            FeatureRow {
                txn_id: txn.txn_id.clone(),
                values: [
                    amount,
                    amount * amount,
                    f64::from(hour),
                    f64::from(txn.timestamp.weekday().num_days_from_monday()),
                    if late_night { 1.0 } else { 0.0 },
                    if discretionary { 1.0 } else { 0.0 },
                    rolling[i],
                ],
                amount,
                is_late_night: late_night,
                is_discretionary: discretionary,
            }
        })
        .collect()
}

fn decimal_to_f64(txn: &Transaction) -> f64 {
    txn.amount.to_f64().unwrap_or(0.0)
}
