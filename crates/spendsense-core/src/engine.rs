//! Risk engine: orchestrates detectors and the anomaly scorer, owns the
//! transaction history and intercept log, records decisions, and derives
//! dashboard metrics.
//!
//! One engine instance per session, owned by the caller. Single-threaded and
//! synchronous; callers needing concurrent access must add their own locking.

use chrono::{Duration, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::anomaly::AnomalyScorer;
use crate::detectors::{BehavioralDetector, ContextualDetector, Detector};
use crate::error::SpendSenseError;
use crate::types::{
    DashboardMetrics, Decision, DetectorKind, InterceptEntry, Money, RiskAssessment, RiskFlag,
    Severity, Transaction,
};
use crate::SpendSenseResult;

/// History window supplied to the contextual detector, in minutes.
const CONTEXT_WINDOW_MINUTES: i64 = 24 * 60;

pub struct RiskEngine {
    detectors: Vec<Box<dyn Detector>>,
    scorer: AnomalyScorer,

    // In-memory stores, owned exclusively by the engine.
    transactions: Vec<Transaction>,
    intercept_log: Vec<InterceptEntry>,
    money_saved: Money,

    /// Cached model verdicts keyed by txn id, refreshed on each training cycle.
    model_flags: HashMap<String, RiskFlag>,
    /// Assessment awaiting a user decision, if any.
    pending: Option<RiskAssessment>,
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskEngine {
    /// Engine with the standard detector set: behavioral, then contextual.
    pub fn new() -> Self {
        Self::with_detectors(vec![
            Box::new(BehavioralDetector::new()),
            Box::new(ContextualDetector::new()),
        ])
    }

    /// Engine with a custom detector chain. Flags are collected in detector
    /// registration order, with any cached model flag appended last.
    pub fn with_detectors(detectors: Vec<Box<dyn Detector>>) -> Self {
        RiskEngine {
            detectors,
            scorer: AnomalyScorer::new(),
            transactions: Vec::new(),
            intercept_log: Vec::new(),
            money_saved: Decimal::ZERO,
            model_flags: HashMap::new(),
            pending: None,
        }
    }

    // ------------------------------------------------------------------
    // Core API
    // ------------------------------------------------------------------

    /// Run a transaction through every detector plus the cached anomaly
    /// verdict and return a [`RiskAssessment`].
    ///
    /// Sets `txn.is_flagged` as a side effect. Never mutates history; the
    /// contextual window is anchored at the most recent timestamp across all
    /// stored transactions (dataset time, not wall clock), so replaying a
    /// historical dataset is deterministic.
    pub fn evaluate_transaction(&self, txn: &mut Transaction) -> RiskAssessment {
        let recent = self.recent_transactions(&txn.user_id, CONTEXT_WINDOW_MINUTES);

        let mut flags: Vec<RiskFlag> = Vec::new();
        for detector in &self.detectors {
            let found = detector.detect(txn, &recent);
            if !found.is_empty() {
                debug!(
                    detector = detector.name(),
                    flags = found.len(),
                    txn_id = %txn.txn_id,
                    "detector raised flags"
                );
            }
            flags.extend(found);
        }
        if let Some(model_flag) = self.model_flags.get(&txn.txn_id) {
            flags.push(model_flag.clone());
        }

        txn.is_flagged = !flags.is_empty();
        debug!(
            txn_id = %txn.txn_id,
            flags = flags.len(),
            flagged = txn.is_flagged,
            "evaluated transaction"
        );

        RiskAssessment {
            transaction: txn.clone(),
            is_flagged: txn.is_flagged,
            risk_flags: flags,
            evaluated_at: now(),
        }
    }

    /// Store a transaction in the in-memory history. Appends unconditionally;
    /// deduplication by id is the caller's responsibility.
    pub fn add_transaction(&mut self, txn: Transaction) {
        self.transactions.push(txn);
    }

    /// Train the anomaly scorer on a historical batch, then immediately
    /// batch-predict and cache a model flag for every anomalous txn id.
    ///
    /// The scorer is never consulted inline during evaluation; this is the
    /// one training cycle per dataset.
    pub fn train_scorer(&mut self, batch: &[Transaction]) {
        self.scorer.fit(batch);
        let predictions = self.scorer.predict_batch(batch);

        self.model_flags.clear();
        for (txn_id, prediction) in predictions {
            if prediction.is_anomaly {
                self.model_flags.insert(
                    txn_id,
                    RiskFlag {
                        rule_name: "unusual_pattern".into(),
                        explanation: "This purchase significantly deviates from your \
                                      established spending habits."
                            .into(),
                        severity: Severity::High,
                        detector: DetectorKind::Model,
                    },
                );
            }
        }
        debug!(anomalous = self.model_flags.len(), "cached anomaly verdicts");
    }

    /// Record the user's decision on a flagged transaction.
    ///
    /// Sets `txn.user_decision`, mirrors it onto the stored history entry,
    /// appends an intercept log entry, and adds the amount to money saved
    /// when the decision is [`Decision::Cancelled`]. A second decision for
    /// the same txn id is rejected with `InvalidState` and mutates nothing.
    pub fn record_decision(
        &mut self,
        txn: &mut Transaction,
        assessment: &RiskAssessment,
        decision: Decision,
    ) -> SpendSenseResult<InterceptEntry> {
        if self.intercept_log.iter().any(|e| e.txn_id == txn.txn_id) {
            return Err(SpendSenseError::InvalidState(format!(
                "a decision was already recorded for transaction '{}'",
                txn.txn_id
            )));
        }

        txn.user_decision = Some(decision);
        if let Some(stored) = self.transactions.iter_mut().find(|t| t.txn_id == txn.txn_id) {
            stored.user_decision = Some(decision);
        }

        let entry = InterceptEntry {
            txn_id: txn.txn_id.clone(),
            transaction: txn.clone(),
            risk_flags: assessment.risk_flags.clone(),
            decision,
            decision_timestamp: now(),
            risk_explanations: assessment
                .risk_flags
                .iter()
                .map(|f| f.explanation.clone())
                .collect(),
        };
        self.intercept_log.push(entry.clone());

        if decision == Decision::Cancelled {
            self.money_saved += txn.amount;
        }

        info!(
            txn_id = %txn.txn_id,
            decision = %decision,
            amount = %txn.amount,
            "recorded decision"
        );
        Ok(entry)
    }

    // ------------------------------------------------------------------
    // Pending decision surface
    // ------------------------------------------------------------------

    /// Hold a flagged assessment until the caller supplies a decision. Any
    /// cooling-off countdown happens outside the core; the engine just keeps
    /// the flagged state queryable until [`Self::submit_pending`] is called.
    pub fn hold_pending(&mut self, assessment: RiskAssessment) {
        self.pending = Some(assessment);
    }

    /// The assessment currently awaiting a decision, if any.
    pub fn pending(&self) -> Option<&RiskAssessment> {
        self.pending.as_ref()
    }

    /// One-shot decision submission against the pending assessment.
    ///
    /// `InvalidState` (and no mutation) when nothing is pending; the pending
    /// slot survives a rejected duplicate decision.
    pub fn submit_pending(&mut self, decision: Decision) -> SpendSenseResult<InterceptEntry> {
        let Some(assessment) = self.pending.take() else {
            return Err(SpendSenseError::InvalidState(
                "no pending assessment awaiting a decision".into(),
            ));
        };

        let mut txn = assessment.transaction.clone();
        match self.record_decision(&mut txn, &assessment, decision) {
            Ok(entry) => Ok(entry),
            Err(e) => {
                self.pending = Some(assessment);
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Query helpers
    // ------------------------------------------------------------------

    /// Transactions for `user_id` within the trailing window, anchored at
    /// the most recent stored timestamp (not wall clock).
    pub fn recent_transactions(&self, user_id: &str, window_minutes: i64) -> Vec<Transaction> {
        let Some(latest) = self.transactions.iter().map(|t| t.timestamp).max() else {
            return Vec::new();
        };
        let cutoff = latest - Duration::minutes(window_minutes);
        self.transactions
            .iter()
            .filter(|t| t.user_id == user_id && t.timestamp >= cutoff)
            .cloned()
            .collect()
    }

    /// Every transaction stored in memory, in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Intercept log entries in recording order, optionally restricted to
    /// one decision value.
    pub fn get_intercept_log(&self, filter: Option<Decision>) -> Vec<InterceptEntry> {
        self.intercept_log
            .iter()
            .filter(|e| filter.is_none_or(|d| e.decision == d))
            .cloned()
            .collect()
    }

    /// Total saved from cancelled transactions.
    pub fn money_saved(&self) -> Money {
        self.money_saved
    }

    /// Aggregated dashboard metrics, recomputed fresh on every call.
    pub fn get_metrics(&self) -> DashboardMetrics {
        let total = self.transactions.len();
        let flagged = self.transactions.iter().filter(|t| t.is_flagged).count();
        let proceeded = self
            .intercept_log
            .iter()
            .filter(|e| e.decision == Decision::Proceeded)
            .count();

        let override_rate = if flagged > 0 {
            Decimal::from(proceeded as u64) / Decimal::from(flagged as u64) * dec!(100)
        } else {
            Decimal::ZERO
        };

        let late_night = self.transactions.iter().filter(|t| t.is_late_night()).count();
        let impulsivity = impulsivity_score(override_rate, late_night, total);

        DashboardMetrics {
            total_transactions: total,
            total_flagged: flagged,
            money_saved: self.money_saved,
            override_rate: override_rate.round_dp(1),
            impulsivity_score: impulsivity.round_dp(1),
        }
    }
}

/// Weighted impulsivity score in [0, 100]:
/// `0.6 × override_rate + 0.4 × late_night_pct`, both percentages.
fn impulsivity_score(override_rate: Decimal, late_night_count: usize, total_count: usize) -> Decimal {
    let late_night_pct = if total_count > 0 {
        Decimal::from(late_night_count as u64) / Decimal::from(total_count as u64) * dec!(100)
    } else {
        Decimal::ZERO
    };
    let score = dec!(0.6) * override_rate + dec!(0.4) * late_night_pct;
    score.clamp(Decimal::ZERO, dec!(100))
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Channel, RecipientStatus};
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn txn(id: &str, amount: Decimal, budget: Decimal) -> Transaction {
        Transaction {
            txn_id: id.into(),
            user_id: "USR_TEST".into(),
            timestamp: at(28, 12, 0),
            amount,
            category: "shopping".into(),
            recipient_status: RecipientStatus::Existing,
            monthly_budget_remaining: budget,
            device_id: "DEV_A".into(),
            location: "New York".into(),
            channel: Channel::MobileApp,
            is_flagged: false,
            user_decision: None,
        }
    }

    /// Evaluate, store, and record a decision in the caller-facing order.
    fn evaluate_and_decide(engine: &mut RiskEngine, mut t: Transaction, decision: Decision) {
        let assessment = engine.evaluate_transaction(&mut t);
        engine.add_transaction(t.clone());
        engine
            .record_decision(&mut t, &assessment, decision)
            .unwrap();
    }

    #[test]
    fn clean_transaction_not_flagged() {
        let engine = RiskEngine::new();
        let mut t = txn("T", dec!(10), dec!(1000));
        let assessment = engine.evaluate_transaction(&mut t);
        assert!(!assessment.is_flagged);
        assert!(assessment.risk_flags.is_empty());
        assert!(!t.is_flagged);
    }

    #[test]
    fn risky_transaction_flagged() {
        let engine = RiskEngine::new();
        let mut t = txn("T", dec!(600), dec!(800));
        t.recipient_status = RecipientStatus::New;
        let assessment = engine.evaluate_transaction(&mut t);
        assert!(assessment.is_flagged);
        assert!(t.is_flagged);
        assert!(assessment.risk_flags.len() >= 2);
    }

    #[test]
    fn flags_ordered_behavioral_then_contextual() {
        let engine = RiskEngine::new();
        let mut t = txn("T", dec!(600), dec!(800));
        t.recipient_status = RecipientStatus::New;
        t.timestamp = at(28, 23, 0);
        let assessment = engine.evaluate_transaction(&mut t);
        let kinds: Vec<DetectorKind> = assessment.risk_flags.iter().map(|f| f.detector).collect();
        assert_eq!(
            kinds,
            vec![
                DetectorKind::Behavioral,
                DetectorKind::Behavioral,
                DetectorKind::Contextual
            ]
        );
    }

    #[test]
    fn end_to_end_scenario() {
        // amount=600 against a remaining budget of 800 (75% > 50%), new
        // recipient, midday: budget_drain + new_recipient, then cancelled.
        let mut engine = RiskEngine::new();
        let mut t = txn("T", dec!(600), dec!(800));
        t.recipient_status = RecipientStatus::New;

        let assessment = engine.evaluate_transaction(&mut t);
        assert!(assessment.is_flagged);
        let rules: Vec<&str> = assessment
            .risk_flags
            .iter()
            .map(|f| f.rule_name.as_str())
            .collect();
        assert_eq!(rules, vec!["budget_drain", "new_recipient"]);

        engine.add_transaction(t.clone());
        engine
            .record_decision(&mut t, &assessment, Decision::Cancelled)
            .unwrap();

        assert_eq!(engine.money_saved(), dec!(600));
        let log = engine.get_intercept_log(None);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].risk_explanations.len(), 2);
        assert_eq!(t.user_decision, Some(Decision::Cancelled));
    }

    #[test]
    fn record_proceeded_saves_nothing() {
        let mut engine = RiskEngine::new();
        evaluate_and_decide(&mut engine, txn("T", dec!(100), dec!(120)), Decision::Proceeded);
        assert_eq!(engine.money_saved(), Decimal::ZERO);
        assert_eq!(engine.get_intercept_log(None)[0].decision, Decision::Proceeded);
    }

    #[test]
    fn money_saved_accumulates() {
        let mut engine = RiskEngine::new();
        for i in 0..3 {
            evaluate_and_decide(
                &mut engine,
                txn(&format!("T{i}"), dec!(50), dec!(60)),
                Decision::Cancelled,
            );
        }
        assert_eq!(engine.money_saved(), dec!(150));
    }

    #[test]
    fn double_decision_rejected() {
        let mut engine = RiskEngine::new();
        let mut t = txn("T", dec!(100), dec!(120));
        let assessment = engine.evaluate_transaction(&mut t);
        engine.add_transaction(t.clone());
        engine
            .record_decision(&mut t, &assessment, Decision::Cancelled)
            .unwrap();

        let err = engine
            .record_decision(&mut t, &assessment, Decision::Cancelled)
            .unwrap_err();
        assert!(matches!(err, SpendSenseError::InvalidState(_)));
        assert_eq!(engine.money_saved(), dec!(100));
        assert_eq!(engine.get_intercept_log(None).len(), 1);
    }

    #[test]
    fn decision_mirrored_onto_history() {
        let mut engine = RiskEngine::new();
        evaluate_and_decide(&mut engine, txn("T", dec!(100), dec!(120)), Decision::Proceeded);
        assert_eq!(engine.transactions()[0].user_decision, Some(Decision::Proceeded));
    }

    #[test]
    fn override_rate_half() {
        let mut engine = RiskEngine::new();
        evaluate_and_decide(&mut engine, txn("T1", dec!(600), dec!(800)), Decision::Proceeded);
        evaluate_and_decide(&mut engine, txn("T2", dec!(600), dec!(800)), Decision::Cancelled);

        let metrics = engine.get_metrics();
        assert_eq!(metrics.total_transactions, 2);
        assert_eq!(metrics.total_flagged, 2);
        assert_eq!(metrics.override_rate, dec!(50.0));
        assert_eq!(metrics.money_saved, dec!(600));
    }

    #[test]
    fn override_rate_zero_without_flags() {
        let mut engine = RiskEngine::new();
        let mut t = txn("T", dec!(10), dec!(1000));
        engine.evaluate_transaction(&mut t);
        engine.add_transaction(t);
        let metrics = engine.get_metrics();
        assert_eq!(metrics.total_flagged, 0);
        assert_eq!(metrics.override_rate, Decimal::ZERO);
    }

    #[test]
    fn metrics_on_empty_engine() {
        let metrics = RiskEngine::new().get_metrics();
        assert_eq!(metrics.total_transactions, 0);
        assert_eq!(metrics.total_flagged, 0);
        assert_eq!(metrics.money_saved, Decimal::ZERO);
        assert_eq!(metrics.override_rate, Decimal::ZERO);
        assert_eq!(metrics.impulsivity_score, Decimal::ZERO);
    }

    #[test]
    fn impulsivity_score_in_range() {
        let mut engine = RiskEngine::new();
        let mut t = txn("T", dec!(10), dec!(1000));
        engine.evaluate_transaction(&mut t);
        engine.add_transaction(t);
        let score = engine.get_metrics().impulsivity_score;
        assert!(score >= Decimal::ZERO && score <= dec!(100));
    }

    #[test]
    fn impulsivity_score_maximum() {
        // Every transaction late-night and every flagged one proceeded:
        // 0.6 * 100 + 0.4 * 100 = 100.
        let mut engine = RiskEngine::new();
        for i in 0..2 {
            let mut t = txn(&format!("T{i}"), dec!(600), dec!(800));
            t.timestamp = at(28, 23, 0);
            evaluate_and_decide(&mut engine, t, Decision::Proceeded);
        }
        assert_eq!(engine.get_metrics().impulsivity_score, dec!(100.0));
    }

    #[test]
    fn impulsivity_blends_override_and_late_night() {
        // 1 of 2 transactions late-night, the flagged one proceeded:
        // override 100, late-night 50 -> 0.6*100 + 0.4*50 = 80.
        let mut engine = RiskEngine::new();
        let mut late = txn("T1", dec!(600), dec!(800));
        late.timestamp = at(28, 23, 0);
        evaluate_and_decide(&mut engine, late, Decision::Proceeded);

        let mut clean = txn("T2", dec!(10), dec!(1000));
        // Different user so the frequency/device rules stay quiet.
        clean.user_id = "USR_OTHER".into();
        engine.evaluate_transaction(&mut clean);
        engine.add_transaction(clean);

        let metrics = engine.get_metrics();
        assert_eq!(metrics.total_flagged, 1);
        assert_eq!(metrics.override_rate, dec!(100.0));
        assert_eq!(metrics.impulsivity_score, dec!(80.0));
    }

    #[test]
    fn intercept_log_filtering() {
        let mut engine = RiskEngine::new();
        evaluate_and_decide(&mut engine, txn("T1", dec!(100), dec!(120)), Decision::Cancelled);
        evaluate_and_decide(&mut engine, txn("T2", dec!(200), dec!(250)), Decision::Proceeded);

        let cancelled = engine.get_intercept_log(Some(Decision::Cancelled));
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].txn_id, "T1");
        let proceeded = engine.get_intercept_log(Some(Decision::Proceeded));
        assert_eq!(proceeded.len(), 1);
        assert_eq!(proceeded[0].txn_id, "T2");
        assert_eq!(engine.get_intercept_log(None).len(), 2);
    }

    #[test]
    fn recent_window_anchored_at_dataset_time() {
        // The stored dataset is far in the past relative to wall clock. The
        // 24h window must anchor at the latest stored timestamp, so the
        // device baseline is still visible and the anomaly fires.
        let mut engine = RiskEngine::new();
        let mut prior = txn("T1", dec!(10), dec!(1000));
        prior.timestamp = at(28, 10, 0);
        engine.add_transaction(prior);

        let mut current = txn("T2", dec!(10), dec!(1000));
        current.timestamp = at(28, 12, 0);
        current.device_id = "DEV_B".into();
        let assessment = engine.evaluate_transaction(&mut current);
        assert!(assessment
            .risk_flags
            .iter()
            .any(|f| f.rule_name == "device_anomaly"));
    }

    #[test]
    fn frequency_burst_through_engine() {
        let mut engine = RiskEngine::new();
        for (i, min) in [0u32, 4].iter().enumerate() {
            let mut t = txn(&format!("T{i}"), dec!(10), dec!(1000));
            t.timestamp = at(28, 12, *min);
            engine.add_transaction(t);
        }
        let mut current = txn("T9", dec!(10), dec!(1000));
        current.timestamp = at(28, 12, 8);
        let assessment = engine.evaluate_transaction(&mut current);
        assert!(assessment
            .risk_flags
            .iter()
            .any(|f| f.rule_name == "frequency_burst"));
    }

    #[test]
    fn evaluation_does_not_mutate_history() {
        let mut engine = RiskEngine::new();
        let mut prior = txn("T1", dec!(10), dec!(1000));
        prior.timestamp = at(28, 10, 0);
        engine.add_transaction(prior);

        let mut current = txn("T2", dec!(10), dec!(1000));
        engine.evaluate_transaction(&mut current);
        assert_eq!(engine.transactions().len(), 1);
        assert_eq!(engine.transactions()[0].txn_id, "T1");
    }

    #[test]
    fn round_trip_through_history() {
        let mut engine = RiskEngine::new();
        let mut t = txn("T", dec!(600), dec!(800));
        let assessment = engine.evaluate_transaction(&mut t);
        engine.add_transaction(t);

        let matching: Vec<&Transaction> = engine
            .transactions()
            .iter()
            .filter(|s| s.txn_id == "T")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].is_flagged, assessment.is_flagged);
    }

    fn training_batch() -> Vec<Transaction> {
        let mut batch: Vec<Transaction> = (0..12)
            .map(|i| {
                let mut t = txn(&format!("B{i}"), Decimal::from(10 + i), dec!(1000));
                t.category = "groceries".into();
                t.timestamp = at((i + 1) as u32, 12, 0);
                t
            })
            .collect();
        // One late-night discretionary purchase the heuristic must catch.
        let mut night = txn("NIGHT", dec!(40), dec!(1000));
        night.timestamp = at(14, 23, 0);
        batch.push(night);
        batch
    }

    #[test]
    fn model_flag_appended_after_training() {
        let mut engine = RiskEngine::new();
        let batch = training_batch();
        engine.train_scorer(&batch);

        let mut night = batch.last().unwrap().clone();
        let assessment = engine.evaluate_transaction(&mut night);
        let model_flags: Vec<&RiskFlag> = assessment
            .risk_flags
            .iter()
            .filter(|f| f.detector == DetectorKind::Model)
            .collect();
        assert_eq!(model_flags.len(), 1);
        assert_eq!(model_flags[0].rule_name, "unusual_pattern");
        assert_eq!(model_flags[0].severity, Severity::High);
        // Model flag comes after the rule detectors.
        assert_eq!(
            assessment.risk_flags.last().unwrap().detector,
            DetectorKind::Model
        );
    }

    #[test]
    fn untrained_scorer_adds_no_model_flags() {
        let mut engine = RiskEngine::new();
        let batch = &training_batch()[..5];
        engine.train_scorer(batch);

        let mut night = txn("NIGHT", dec!(40), dec!(1000));
        night.timestamp = at(14, 23, 0);
        let assessment = engine.evaluate_transaction(&mut night);
        assert!(assessment
            .risk_flags
            .iter()
            .all(|f| f.detector != DetectorKind::Model));
    }

    #[test]
    fn retraining_replaces_cached_verdicts() {
        let mut engine = RiskEngine::new();
        engine.train_scorer(&training_batch());
        // Retrain on a batch too small to train: cache must be cleared.
        engine.train_scorer(&training_batch()[..5]);

        let mut night = txn("NIGHT", dec!(40), dec!(1000));
        night.timestamp = at(14, 23, 0);
        let assessment = engine.evaluate_transaction(&mut night);
        assert!(assessment
            .risk_flags
            .iter()
            .all(|f| f.detector != DetectorKind::Model));
    }

    #[test]
    fn pending_decision_flow() {
        let mut engine = RiskEngine::new();
        let mut t = txn("T", dec!(600), dec!(800));
        let assessment = engine.evaluate_transaction(&mut t);
        engine.add_transaction(t);

        engine.hold_pending(assessment);
        assert!(engine.pending().is_some());

        let entry = engine.submit_pending(Decision::Cancelled).unwrap();
        assert_eq!(entry.txn_id, "T");
        assert_eq!(entry.decision, Decision::Cancelled);
        assert_eq!(engine.money_saved(), dec!(600));
        assert!(engine.pending().is_none());
    }

    #[test]
    fn submit_without_pending_is_invalid_state() {
        let mut engine = RiskEngine::new();
        let err = engine.submit_pending(Decision::Cancelled).unwrap_err();
        assert!(matches!(err, SpendSenseError::InvalidState(_)));
        assert_eq!(engine.get_intercept_log(None).len(), 0);
        assert_eq!(engine.money_saved(), Decimal::ZERO);
    }
}
