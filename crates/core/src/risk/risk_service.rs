use std::collections::HashMap;

use log::{debug, warn};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::FULL_ALLOCATION_PERCENT;
use crate::errors::Result;

use super::risk_constants::CAPPED_CATEGORIES;
use super::risk_model::{
    BlendedCaps, CategoryLimitCheck, HoldingCategory, RawTargetLine, RiskAssessment, RiskBand,
    RiskLimitConfig, RiskTier, RiskTierAllocation, TargetAllocationLine, ValidationOutcome,
};
use super::risk_traits::RiskLimitEngineTrait;

/// Where a capped category's total lands relative to its cap.
enum LimitBreach {
    Violation(CategoryLimitCheck),
    Warning(CategoryLimitCheck),
}

/// Blends risk-tier caps, validates target allocations against them and
/// scores holdings.
#[derive(Debug, Clone, Default)]
pub struct RiskLimitEngine {
    config: RiskLimitConfig,
}

impl RiskLimitEngine {
    /// Creates an engine after validating `config`.
    pub fn new(config: RiskLimitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn round_cap(&self, cap: Decimal) -> Decimal {
        cap.round_dp_with_strategy(
            self.config.cap_decimal_places,
            RoundingStrategy::MidpointAwayFromZero,
        )
    }

    /// Classifies one capped category's summed percentage against its cap.
    fn check_category(
        &self,
        category: HoldingCategory,
        current_percentage: Decimal,
        blended_cap: Decimal,
    ) -> Option<LimitBreach> {
        let max_allowed = self.round_cap(blended_cap);

        if current_percentage > max_allowed {
            return Some(LimitBreach::Violation(CategoryLimitCheck {
                category,
                current_percentage,
                max_allowed,
                exceeded_by: current_percentage.saturating_sub(max_allowed),
            }));
        }

        if max_allowed > Decimal::ZERO
            && current_percentage >= max_allowed * self.config.warning_ratio
        {
            return Some(LimitBreach::Warning(CategoryLimitCheck {
                category,
                current_percentage,
                max_allowed,
                exceeded_by: Decimal::ZERO,
            }));
        }

        None
    }

    fn parse_raw_lines(lines: &[RawTargetLine]) -> Vec<TargetAllocationLine> {
        lines
            .iter()
            .filter_map(|line| match line.parse() {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Ignoring target line as uncapped: {}", e);
                    None
                }
            })
            .collect()
    }
}

impl RiskLimitEngineTrait for RiskLimitEngine {
    fn blend_caps(&self, allocation: &RiskTierAllocation) -> BlendedCaps {
        let hundred = Decimal::from(FULL_ALLOCATION_PERCENT);
        let table = &self.config.cap_table;

        let blend = |category: HoldingCategory| -> Decimal {
            RiskTier::ALL
                .iter()
                .map(|tier| {
                    let cap = table.row(*tier).get(category).unwrap_or_default();
                    (allocation.get(*tier) / hundred).saturating_mul(cap)
                })
                .fold(Decimal::ZERO, Decimal::saturating_add)
        };

        BlendedCaps {
            double_long_etf: blend(HoldingCategory::DoubleLongEtf),
            security: blend(HoldingCategory::Security),
            single_etf: blend(HoldingCategory::SingleEtf),
        }
    }

    fn validate(
        &self,
        lines: &[TargetAllocationLine],
        allocation: &RiskTierAllocation,
    ) -> ValidationOutcome {
        if !allocation.is_complete() {
            debug!(
                "Validating against incomplete tier allocation (total {})",
                allocation.total()
            );
        }

        let blended_caps = self.blend_caps(allocation);

        let mut totals: HashMap<HoldingCategory, Decimal> = HashMap::new();
        for line in lines {
            let total = totals.entry(line.category).or_insert(Decimal::ZERO);
            *total = total.saturating_add(line.target_percentage);
        }

        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        for category in CAPPED_CATEGORIES {
            let current = totals.get(&category).copied().unwrap_or_default();
            let cap = blended_caps.get(category).unwrap_or_default();

            match self.check_category(category, current, cap) {
                Some(LimitBreach::Violation(check)) => violations.push(check),
                Some(LimitBreach::Warning(check)) => warnings.push(check),
                None => {}
            }
        }

        debug!(
            "Validated {} target lines: {} violations, {} warnings",
            lines.len(),
            violations.len(),
            warnings.len()
        );

        ValidationOutcome {
            is_valid: violations.is_empty(),
            violations,
            warnings,
            blended_caps,
        }
    }

    fn validate_raw(
        &self,
        lines: &[RawTargetLine],
        allocation: &RiskTierAllocation,
    ) -> ValidationOutcome {
        self.validate(&Self::parse_raw_lines(lines), allocation)
    }

    fn score(&self, holdings: &[TargetAllocationLine]) -> Decimal {
        weighted_mean(holdings, Decimal::ONE)
            .or_else(|| {
                // Percentages near Decimal::MAX overflow the weighted sum.
                // Scaling every weight down by 4n keeps both sums in range.
                let scale = Decimal::from(holdings.len()).saturating_mul(Decimal::from(4));
                weighted_mean(holdings, scale)
            })
            .unwrap_or(Decimal::ZERO)
    }

    fn score_raw(&self, holdings: &[RawTargetLine]) -> Decimal {
        self.score(&Self::parse_raw_lines(holdings))
    }

    fn assess(&self, holdings: &[TargetAllocationLine]) -> RiskAssessment {
        let score = self.score(holdings);
        if score.is_zero() {
            return RiskAssessment::undetermined();
        }
        RiskAssessment::from_score(score)
    }
}

/// Mean risk weight with each percentage divided by `scale`. Returns `None`
/// on overflow and zero when the holdings carry no weight.
fn weighted_mean(holdings: &[TargetAllocationLine], scale: Decimal) -> Option<Decimal> {
    let mut total_weight = Decimal::ZERO;
    let mut weighted = Decimal::ZERO;

    for holding in holdings {
        let pct = holding.target_percentage.checked_div(scale)?;
        total_weight = total_weight.checked_add(pct)?;
        let contribution = Decimal::from(holding.category.risk_weight()).checked_mul(pct)?;
        weighted = weighted.checked_add(contribution)?;
    }

    if total_weight.is_zero() {
        return Some(Decimal::ZERO);
    }
    weighted.checked_div(total_weight)
}

/// Blends caps with the default cap table.
pub fn blend_caps(allocation: &RiskTierAllocation) -> BlendedCaps {
    RiskLimitEngine::default().blend_caps(allocation)
}

/// Validates target lines with the default configuration.
pub fn validate_allocations(
    lines: &[TargetAllocationLine],
    allocation: &RiskTierAllocation,
) -> ValidationOutcome {
    RiskLimitEngine::default().validate(lines, allocation)
}

/// Scores holdings with the default category weights.
pub fn risk_score(holdings: &[TargetAllocationLine]) -> Decimal {
    RiskLimitEngine::default().score(holdings)
}

/// Label for a risk score.
pub fn label_for_score(score: Decimal) -> &'static str {
    RiskBand::from_score(score).label()
}

/// Color for a risk score.
pub fn color_for_score(score: Decimal) -> &'static str {
    RiskBand::from_score(score).color()
}
