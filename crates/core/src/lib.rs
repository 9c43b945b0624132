//! Wealthdesk Core - risk limits and alert deviation classification.
//!
//! This crate contains the pure computations behind the advisor back office:
//! blending an account's risk-tier allocation into category caps, validating
//! target allocations against those caps, scoring holdings, and classifying
//! the accounts affected by a trading alert. It performs no I/O; callers load
//! accounts, positions and targets and pass them in as plain data.

pub mod alerts;
pub mod constants;
pub mod errors;
pub mod risk;

pub use alerts::{
    classify_accounts, AccountSnapshot, AffectedAccount, ClassificationResult,
    DeviationClassifier, DeviationClassifierTrait, DeviationStatus, SignalDirection,
};
pub use risk::{
    blend_caps, color_for_score, label_for_score, risk_score, validate_allocations,
    HoldingCategory, RiskLimitEngine, RiskLimitEngineTrait, RiskTier, RiskTierAllocation,
    TargetAllocationLine, ValidationOutcome,
};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
