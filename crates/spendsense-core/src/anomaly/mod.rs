//! Statistical anomaly scoring.
//!
//! The scorer learns a baseline of "normal" spending from a batch of
//! historical transactions ([`AnomalyScorer::fit`]) and assigns each a
//! binary anomaly verdict plus a continuous score
//! ([`AnomalyScorer::predict_batch`]). It is trained once per batch and the
//! verdicts are cached by the engine; it is never consulted inline during
//! evaluation.

mod features;
mod scorer;

pub use scorer::{AnomalyScorer, Prediction, MIN_TRAINING_BATCH};
