//! Rule-based risk detectors.
//!
//! Each detector implements [`Detector`] and returns every triggered
//! [`RiskFlag`] for a transaction; rules are evaluated independently with no
//! short-circuiting. The engine composes detectors through the trait, so new
//! detector variants plug in without engine changes.

pub mod behavioral;
pub mod contextual;

pub use behavioral::BehavioralDetector;
pub use contextual::ContextualDetector;

use crate::types::{RiskFlag, Transaction};

/// Capability interface shared by all rule detectors.
///
/// `history` holds the user's recent transactions, supplied by the caller.
/// Detectors that only inspect the transaction itself ignore it.
pub trait Detector {
    fn name(&self) -> &'static str;

    fn detect(&self, txn: &Transaction, history: &[Transaction]) -> Vec<RiskFlag>;
}
