use rust_decimal::Decimal;

use super::risk_model::{
    BlendedCaps, RawTargetLine, RiskAssessment, RiskTierAllocation, TargetAllocationLine,
    ValidationOutcome,
};

/// Trait defining the contract for risk limit operations.
///
/// Every operation is a pure function of its arguments and the engine's
/// immutable configuration.
pub trait RiskLimitEngineTrait: Send + Sync {
    /// Blends the cap table into per-category caps, weighted by `allocation`.
    fn blend_caps(&self, allocation: &RiskTierAllocation) -> BlendedCaps;

    /// Validates candidate target allocations against the blended caps.
    fn validate(
        &self,
        lines: &[TargetAllocationLine],
        allocation: &RiskTierAllocation,
    ) -> ValidationOutcome;

    /// Validates lines carrying unparsed category tags. Unknown tags are
    /// treated as uncapped.
    fn validate_raw(
        &self,
        lines: &[RawTargetLine],
        allocation: &RiskTierAllocation,
    ) -> ValidationOutcome;

    /// Holdings-weighted mean risk weight, or 0 when there is no weight.
    fn score(&self, holdings: &[TargetAllocationLine]) -> Decimal;

    /// Scores holdings carrying unparsed category tags, skipping unknown tags.
    fn score_raw(&self, holdings: &[RawTargetLine]) -> Decimal;

    /// Scores holdings and resolves the band, label and color.
    fn assess(&self, holdings: &[TargetAllocationLine]) -> RiskAssessment;
}
