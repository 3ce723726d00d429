//! Contextual detector: anomalies judged against the user's recent
//! transaction history. The history slice is caller-supplied; this detector
//! does no fetching of its own.

use chrono::Duration;
use std::collections::HashSet;

use crate::detectors::Detector;
use crate::types::{DetectorKind, RecipientStatus, RiskFlag, Severity, Transaction};

#[derive(Debug, Default)]
pub struct ContextualDetector;

impl ContextualDetector {
    pub fn new() -> Self {
        Self
    }

    /// Flag the first transaction with a recipient. No history needed.
    fn check_new_recipient(&self, txn: &Transaction) -> Option<RiskFlag> {
        if txn.recipient_status == RecipientStatus::New {
            return Some(RiskFlag {
                rule_name: "new_recipient".into(),
                explanation: "This is your first transaction with this recipient. \
                              Please verify before proceeding."
                    .into(),
                severity: Severity::Medium,
                detector: DetectorKind::Contextual,
            });
        }
        None
    }

    /// Flag 3+ same-user transactions inside a 10-minute window (2 prior
    /// plus the current one). The window is inclusive at both ends.
    fn check_frequency_burst(&self, txn: &Transaction, history: &[Transaction]) -> Option<RiskFlag> {
        let window_start = txn.timestamp - Duration::minutes(10);
        let matched = history
            .iter()
            .filter(|t| {
                t.user_id == txn.user_id
                    && t.timestamp >= window_start
                    && t.timestamp <= txn.timestamp
            })
            .count();

        if matched >= 2 {
            return Some(RiskFlag {
                rule_name: "frequency_burst".into(),
                explanation: format!(
                    "{} transactions detected in the last 10 minutes. \
                     Rapid spending may indicate impulsive behavior.",
                    matched + 1
                ),
                severity: Severity::Medium,
                detector: DetectorKind::Contextual,
            });
        }
        None
    }

    /// Flag a device never seen in the user's last 24 hours of history.
    /// Empty history gives no baseline, so no flag.
    fn check_device_anomaly(&self, txn: &Transaction, history: &[Transaction]) -> Option<RiskFlag> {
        let recent_devices = self.recent_values(txn, history, |t| &t.device_id);

        if !recent_devices.is_empty() && !recent_devices.contains(txn.device_id.as_str()) {
            return Some(RiskFlag {
                rule_name: "device_anomaly".into(),
                explanation: format!(
                    "Transaction from unrecognised device '{}'. \
                     Recent transactions used different devices.",
                    txn.device_id
                ),
                severity: Severity::High,
                detector: DetectorKind::Contextual,
            });
        }
        None
    }

    /// Same logic as the device check, applied to location.
    fn check_location_anomaly(&self, txn: &Transaction, history: &[Transaction]) -> Option<RiskFlag> {
        let recent_locations = self.recent_values(txn, history, |t| &t.location);

        if !recent_locations.is_empty() && !recent_locations.contains(txn.location.as_str()) {
            return Some(RiskFlag {
                rule_name: "location_anomaly".into(),
                explanation: format!(
                    "Transaction from unusual location '{}'. \
                     Recent transactions were from different locations.",
                    txn.location
                ),
                severity: Severity::High,
                detector: DetectorKind::Contextual,
            });
        }
        None
    }

    /// Distinct values of some field across the user's last 24 hours.
    fn recent_values<'a, F>(
        &self,
        txn: &Transaction,
        history: &'a [Transaction],
        field: F,
    ) -> HashSet<&'a str>
    where
        F: Fn(&'a Transaction) -> &'a String,
    {
        if history.is_empty() {
            return HashSet::new();
        }
        let window_start = txn.timestamp - Duration::hours(24);
        history
            .iter()
            .filter(|t| t.user_id == txn.user_id && t.timestamp >= window_start)
            .map(|t| field(t).as_str())
            .collect()
    }
}

impl Detector for ContextualDetector {
    fn name(&self) -> &'static str {
        "contextual"
    }

    fn detect(&self, txn: &Transaction, history: &[Transaction]) -> Vec<RiskFlag> {
        let mut flags = Vec::new();
        if let Some(flag) = self.check_new_recipient(txn) {
            flags.push(flag);
        }
        if let Some(flag) = self.check_frequency_burst(txn, history) {
            flags.push(flag);
        }
        if let Some(flag) = self.check_device_anomaly(txn, history) {
            flags.push(flag);
        }
        if let Some(flag) = self.check_location_anomaly(txn, history) {
            flags.push(flag);
        }
        flags
    }
}
