//! Behavioral detector: risky spending size and timing, judged from the
//! transaction's own fields alone.

use rust_decimal_macros::dec;

use crate::detectors::Detector;
use crate::types::{DetectorKind, RiskFlag, Severity, Transaction};

#[derive(Debug, Default)]
pub struct BehavioralDetector;

impl BehavioralDetector {
    pub fn new() -> Self {
        Self
    }

    /// Flag if the amount exceeds 50% of the remaining monthly budget, or
    /// the budget is already exhausted. Exactly 50% does not flag.
    fn check_budget_drain(&self, txn: &Transaction) -> Option<RiskFlag> {
        if txn.monthly_budget_remaining <= dec!(0) {
            return Some(RiskFlag {
                rule_name: "budget_drain".into(),
                explanation: format!(
                    "This ${:.2} purchase will push you further over budget (remaining: ${:.2}).",
                    txn.amount, txn.monthly_budget_remaining
                ),
                severity: Severity::High,
                detector: DetectorKind::Behavioral,
            });
        }

        if txn.amount > dec!(0.5) * txn.monthly_budget_remaining {
            let pct = (txn.amount / txn.monthly_budget_remaining * dec!(100)).round_dp(0);
            return Some(RiskFlag {
                rule_name: "budget_drain".into(),
                explanation: format!(
                    "This ${:.2} purchase uses {}% of your remaining monthly budget (${:.2}).",
                    txn.amount, pct, txn.monthly_budget_remaining
                ),
                severity: Severity::High,
                detector: DetectorKind::Behavioral,
            });
        }

        None
    }

    /// Flag purchases made between 10 PM and 4 AM.
    fn check_late_night_pattern(&self, txn: &Transaction) -> Option<RiskFlag> {
        if txn.is_late_night() {
            return Some(RiskFlag {
                rule_name: "late_night_regret".into(),
                explanation: format!(
                    "Late-night purchase detected at {}. Purchases made between \
                     10 PM and 4 AM are more likely to be regretted.",
                    txn.timestamp.format("%I:%M %p")
                ),
                severity: Severity::Medium,
                detector: DetectorKind::Behavioral,
            });
        }
        None
    }
}

impl Detector for BehavioralDetector {
    fn name(&self) -> &'static str {
        "behavioral"
    }

    fn detect(&self, txn: &Transaction, _history: &[Transaction]) -> Vec<RiskFlag> {
        let mut flags = Vec::new();
        if let Some(flag) = self.check_budget_drain(txn) {
            flags.push(flag);
        }
        if let Some(flag) = self.check_late_night_pattern(txn) {
            flags.push(flag);
        }
        flags
    }
}
