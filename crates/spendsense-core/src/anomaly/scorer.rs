use rust_decimal::prelude::ToPrimitive;
use statrs::statistics::{Data, OrderStatistics, Statistics};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::anomaly::features::{engineer, FeatureRow, FEATURE_COUNT};
use crate::types::Transaction;

/// Minimum batch size required before the scorer will train.
pub const MIN_TRAINING_BATCH: usize = 10;

/// Fraction of the training batch expected to be anomalous; sets the score
/// cutoff percentile.
const DEFAULT_CONTAMINATION: f64 = 0.08;

/// Percentile of training amounts used as the dynamic high-spend threshold.
const HIGH_SPEND_PERCENTILE: usize = 95;

/// Verdict for one transaction. Higher score = more anomalous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub is_anomaly: bool,
    pub score: f64,
}

impl Prediction {
    fn not_anomalous() -> Self {
        Prediction {
            is_anomaly: false,
            score: 0.0,
        }
    }
}

/// Learns a standardized-feature baseline from a training batch and scores
/// transactions by mean squared z-score. Untrained, every prediction
/// degrades to "not anomalous"; callers must not treat that as an error.
#[derive(Debug, Clone)]
pub struct AnomalyScorer {
    contamination: f64,
    impulsive_hours: HashSet<u32>,
    high_spend_threshold: f64,
    feature_means: [f64; FEATURE_COUNT],
    feature_stds: [f64; FEATURE_COUNT],
    score_cutoff: f64,
    trained: bool,
}

impl Default for AnomalyScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyScorer {
    pub fn new() -> Self {
        Self::with_contamination(DEFAULT_CONTAMINATION)
    }

    pub fn with_contamination(contamination: f64) -> Self {
        AnomalyScorer {
            contamination,
            // Pre-training default; fit() narrows this to the observed set.
            impulsive_hours: (0..=6).collect(),
            high_spend_threshold: 470.0,
            feature_means: [0.0; FEATURE_COUNT],
            feature_stds: [1.0; FEATURE_COUNT],
            score_cutoff: f64::INFINITY,
            trained: false,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Dynamic high-spend threshold, set from the training batch.
    pub fn high_spend_threshold(&self) -> f64 {
        self.high_spend_threshold
    }

    /// Learn the spending baseline from a batch of historical transactions.
    ///
    /// An empty batch is a no-op; a batch under [`MIN_TRAINING_BATCH`] leaves
    /// the scorer untrained. Both are warnings, not errors.
    pub fn fit(&mut self, batch: &[Transaction]) {
        if batch.is_empty() {
            warn!("anomaly scorer received an empty training batch; skipping");
            return;
        }
        if batch.len() < MIN_TRAINING_BATCH {
            warn!(
                batch_size = batch.len(),
                required = MIN_TRAINING_BATCH,
                "not enough transactions to train the anomaly scorer"
            );
            self.trained = false;
            return;
        }

        let amounts: Vec<f64> = batch
            .iter()
            .map(|t| t.amount.to_f64().unwrap_or(0.0))
            .collect();
        let mut amount_data = Data::new(amounts);
        self.high_spend_threshold = amount_data.percentile(HIGH_SPEND_PERCENTILE);
        self.impulsive_hours = [23, 0, 1, 2, 3, 4].into_iter().collect();

        let rows = engineer(batch, &self.impulsive_hours);
        for col in 0..FEATURE_COUNT {
            let values: Vec<f64> = rows.iter().map(|r| r.values[col]).collect();
            self.feature_means[col] = values.iter().mean();
            let std = values.iter().std_dev();
            self.feature_stds[col] = if std.is_finite() && std > 0.0 { std } else { 1.0 };
        }

        let scores: Vec<f64> = rows.iter().map(|r| self.score_row(r)).collect();
        let cutoff_pct = ((1.0 - self.contamination) * 100.0).round() as usize;
        let mut score_data = Data::new(scores);
        self.score_cutoff = score_data.percentile(cutoff_pct.min(100));
        self.trained = true;

        info!(
            transactions = batch.len(),
            high_spend_threshold = self.high_spend_threshold,
            score_cutoff = self.score_cutoff,
            "anomaly scorer trained"
        );
    }

    /// Score a batch, keyed by transaction id.
    ///
    /// The statistical verdict is OR-combined with a heuristic: a
    /// discretionary-category transaction is always anomalous when it falls
    /// in the impulsive-hours set or exceeds the high-spend threshold.
    pub fn predict_batch(&self, batch: &[Transaction]) -> HashMap<String, Prediction> {
        if !self.trained {
            return batch
                .iter()
                .map(|t| (t.txn_id.clone(), Prediction::not_anomalous()))
                .collect();
        }

        engineer(batch, &self.impulsive_hours)
            .into_iter()
            .map(|row| {
                let score = self.score_row(&row);
                let model_verdict = score > self.score_cutoff;
                let heuristic = row.is_discretionary
                    && (row.is_late_night || row.amount > self.high_spend_threshold);
                (
                    row.txn_id,
                    Prediction {
                        is_anomaly: model_verdict || heuristic,
                        score,
                    },
                )
            })
            .collect()
    }

    /// Mean squared z-score across the feature vector.
    fn score_row(&self, row: &FeatureRow) -> f64 {
        let sum: f64 = row
            .values
            .iter()
            .zip(self.feature_means.iter().zip(self.feature_stds.iter()))
            .map(|(value, (mean, std))| {
                let z = (value - mean) / std;
                z * z
            })
            .sum();
        sum / FEATURE_COUNT as f64
    }
}
