use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpendSenseError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Known spending categories. The ingestion layer defaults unknown values
/// rather than rejecting them, so the core treats `category` as an open set.
pub const VALID_CATEGORIES: [&str; 10] = [
    "groceries",
    "dining",
    "entertainment",
    "shopping",
    "bills",
    "travel",
    "health",
    "education",
    "utilities",
    "other",
];

/// Categories considered non-essential for anomaly heuristics.
pub const DISCRETIONARY_CATEGORIES: [&str; 4] = ["shopping", "entertainment", "travel", "dining"];

/// True if the category counts as discretionary spending.
pub fn is_discretionary(category: &str) -> bool {
    let lower = category.to_ascii_lowercase();
    DISCRETIONARY_CATEGORIES.contains(&lower.as_str())
}

/// Whether the recipient has been paid before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientStatus {
    New,
    Existing,
}

impl FromStr for RecipientStatus {
    type Err = SpendSenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(RecipientStatus::New),
            "existing" => Ok(RecipientStatus::Existing),
            other => Err(SpendSenseError::InvalidInput {
                field: "recipient_status".into(),
                reason: format!("Must be 'new' or 'existing', got '{other}'."),
            }),
        }
    }
}

/// Channel the transaction arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    MobileApp,
    Web,
    Pos,
}

impl FromStr for Channel {
    type Err = SpendSenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile_app" => Ok(Channel::MobileApp),
            "web" => Ok(Channel::Web),
            "pos" => Ok(Channel::Pos),
            other => Err(SpendSenseError::InvalidInput {
                field: "channel".into(),
                reason: format!("Must be 'mobile_app', 'web', or 'pos', got '{other}'."),
            }),
        }
    }
}

/// User verdict on a flagged transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Cancelled,
    Proceeded,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Cancelled => write!(f, "cancelled"),
            Decision::Proceeded => write!(f, "proceeded"),
        }
    }
}

impl FromStr for Decision {
    type Err = SpendSenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cancelled" => Ok(Decision::Cancelled),
            "proceeded" => Ok(Decision::Proceeded),
            other => Err(SpendSenseError::InvalidInput {
                field: "user_decision".into(),
                reason: format!("Must be 'cancelled' or 'proceeded', got '{other}'."),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
        }
    }
}

/// Which component produced a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectorKind {
    #[serde(rename = "behavioral")]
    Behavioral,
    #[serde(rename = "contextual")]
    Contextual,
    #[serde(rename = "ml")]
    Model,
}

/// A validated financial transaction plus its evaluation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub txn_id: String,
    pub user_id: String,
    pub timestamp: NaiveDateTime,
    /// Positive and finite; enforced at the ingestion boundary.
    pub amount: Money,
    pub category: String,
    pub recipient_status: RecipientStatus,
    /// May be zero or negative (already over budget).
    pub monthly_budget_remaining: Money,
    pub device_id: String,
    pub location: String,
    pub channel: Channel,

    // Populated after risk evaluation
    #[serde(default)]
    pub is_flagged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_decision: Option<Decision>,
}

impl Transaction {
    /// Late-night window: 10 PM through 3:59 AM.
    pub fn is_late_night(&self) -> bool {
        let hour = self.timestamp.hour();
        hour >= 22 || hour < 4
    }
}

/// A triggered detection rule. Created by detectors only, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFlag {
    pub rule_name: String,
    pub explanation: String,
    pub severity: Severity,
    pub detector: DetectorKind,
}

/// Result of evaluating one transaction through the risk engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub transaction: Transaction,
    /// Insertion order = detector invocation order: behavioral, contextual, model.
    pub risk_flags: Vec<RiskFlag>,
    pub is_flagged: bool,
    pub evaluated_at: NaiveDateTime,
}

/// Permanent record of a decision on a flagged transaction. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptEntry {
    pub txn_id: String,
    pub transaction: Transaction,
    pub risk_flags: Vec<RiskFlag>,
    pub decision: Decision,
    pub decision_timestamp: NaiveDateTime,
    /// Denormalized flag explanations for display.
    pub risk_explanations: Vec<String>,
}

/// Aggregated metrics, recomputed on every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_transactions: usize,
    pub total_flagged: usize,
    pub money_saved: Money,
    /// Percent of flagged transactions the user proceeded with, 1 dp.
    pub override_rate: Decimal,
    /// Composite 0-100 score blending override behavior and late-night frequency, 1 dp.
    pub impulsivity_score: Decimal,
}
