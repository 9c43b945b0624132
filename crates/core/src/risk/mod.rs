//! Risk limits module - tier blending, target allocation validation and
//! risk scoring.

mod risk_constants;
mod risk_errors;
mod risk_model;
mod risk_service;
mod risk_traits;

#[cfg(test)]
mod risk_service_tests;

pub use risk_constants::*;
pub use risk_errors::RiskError;
pub use risk_model::{
    BlendedCaps, CategoryCapTable, CategoryCaps, CategoryLimitCheck, HoldingCategory,
    RawTargetLine, RiskAssessment, RiskBand, RiskLimitConfig, RiskTier, RiskTierAllocation,
    TargetAllocationLine, ValidationOutcome,
};
pub use risk_service::{
    blend_caps, color_for_score, label_for_score, risk_score, validate_allocations,
    RiskLimitEngine,
};
pub use risk_traits::RiskLimitEngineTrait;
