//! SpendSense core: evaluates personal transactions against behavioral and
//! contextual rules plus a trained anomaly scorer, records cancel/proceed
//! decisions on flagged items, and derives spending metrics.
//!
//! Everything is synchronous and in-memory. One [`engine::RiskEngine`]
//! instance per session; nothing persists beyond its lifetime.

pub mod anomaly;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod types;

pub use error::SpendSenseError;
pub use types::*;

/// Standard result type for all spendsense operations
pub type SpendSenseResult<T> = Result<T, SpendSenseError>;
