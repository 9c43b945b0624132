//! Risk limit domain models.
//!
//! This module contains the value types used by the risk limit engine:
//! - Risk tiers and the five-bucket tier allocation an account carries
//! - Holding categories with their risk weights
//! - The tier-to-category cap table and blended caps derived from it
//! - Validation outcomes, risk bands and engine configuration

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::risk_constants::{
    CAPPED_CATEGORIES, DEFAULT_TIER_CAPS, RISK_BAND_UPPER_BOUNDS_TENTHS,
    UNDETERMINED_RISK_COLOR, UNDETERMINED_RISK_LABEL,
};
use super::risk_errors::RiskError;
use crate::constants::{
    CAP_DECIMAL_PRECISION, DEFAULT_WARNING_RATIO_PERCENT, FULL_ALLOCATION_PERCENT,
    MAX_CAP_DECIMAL_PRECISION,
};
use crate::errors::Result;

// =============================================================================
// Risk Tier
// =============================================================================

/// Risk-tolerance buckets, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskTier {
    Low,
    LowMedium,
    Medium,
    MediumHigh,
    High,
}

impl RiskTier {
    /// All tiers, lowest first.
    pub const ALL: [RiskTier; 5] = [
        RiskTier::Low,
        RiskTier::LowMedium,
        RiskTier::Medium,
        RiskTier::MediumHigh,
        RiskTier::High,
    ];

    /// Position of this tier in `RiskTier::ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::LowMedium => "lowMedium",
            RiskTier::Medium => "medium",
            RiskTier::MediumHigh => "mediumHigh",
            RiskTier::High => "high",
        }
    }

    /// Returns a human-friendly label for this tier.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::LowMedium => "Low-Medium",
            RiskTier::Medium => "Medium",
            RiskTier::MediumHigh => "Medium-High",
            RiskTier::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Percentage of an account's risk posture assigned to each tier.
///
/// A complete allocation sums to 100. Incomplete allocations are still valid
/// input: they are an editable value and may be transiently off while an
/// advisor is typing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskTierAllocation {
    pub low: Decimal,
    pub low_medium: Decimal,
    pub medium: Decimal,
    pub medium_high: Decimal,
    pub high: Decimal,
}

impl RiskTierAllocation {
    /// Allocation with the whole posture in a single tier.
    pub fn single(tier: RiskTier) -> Self {
        let mut allocation = Self::default();
        *allocation.get_mut(tier) = Decimal::from(FULL_ALLOCATION_PERCENT);
        allocation
    }

    pub fn get(&self, tier: RiskTier) -> Decimal {
        match tier {
            RiskTier::Low => self.low,
            RiskTier::LowMedium => self.low_medium,
            RiskTier::Medium => self.medium,
            RiskTier::MediumHigh => self.medium_high,
            RiskTier::High => self.high,
        }
    }

    pub fn get_mut(&mut self, tier: RiskTier) -> &mut Decimal {
        match tier {
            RiskTier::Low => &mut self.low,
            RiskTier::LowMedium => &mut self.low_medium,
            RiskTier::Medium => &mut self.medium,
            RiskTier::MediumHigh => &mut self.medium_high,
            RiskTier::High => &mut self.high,
        }
    }

    /// Sum of all five tier percentages.
    pub fn total(&self) -> Decimal {
        RiskTier::ALL
            .iter()
            .map(|tier| self.get(*tier))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// True when the tiers sum to exactly 100.
    pub fn is_complete(&self) -> bool {
        self.total() == Decimal::from(FULL_ALLOCATION_PERCENT)
    }

    /// Percentage still to be assigned (negative when over-allocated).
    pub fn unallocated(&self) -> Decimal {
        Decimal::from(FULL_ALLOCATION_PERCENT).saturating_sub(self.total())
    }
}

// =============================================================================
// Holding Category
// =============================================================================

/// Structural risk classification of a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingCategory {
    /// Diversified, broad-market ETF
    BasketEtf,
    /// ETF concentrated on a single sector, country or theme
    SingleEtf,
    /// Leveraged (double long) ETF
    #[serde(alias = "leveraged_etf")]
    DoubleLongEtf,
    /// Individual security
    Security,
    /// Holding picked up automatically from an import, not yet classified
    AutoAdded,
    Misc,
}

impl HoldingCategory {
    pub const ALL: [HoldingCategory; 6] = [
        HoldingCategory::BasketEtf,
        HoldingCategory::SingleEtf,
        HoldingCategory::DoubleLongEtf,
        HoldingCategory::Security,
        HoldingCategory::AutoAdded,
        HoldingCategory::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HoldingCategory::BasketEtf => "basket_etf",
            HoldingCategory::SingleEtf => "single_etf",
            HoldingCategory::DoubleLongEtf => "double_long_etf",
            HoldingCategory::Security => "security",
            HoldingCategory::AutoAdded => "auto_added",
            HoldingCategory::Misc => "misc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HoldingCategory::BasketEtf => "Basket ETF",
            HoldingCategory::SingleEtf => "Single ETF",
            HoldingCategory::DoubleLongEtf => "Leveraged ETF",
            HoldingCategory::Security => "Security",
            HoldingCategory::AutoAdded => "Auto Added",
            HoldingCategory::Misc => "Miscellaneous",
        }
    }

    /// Risk weight used for scoring, 1 (lowest) to 4 (highest).
    pub fn risk_weight(&self) -> u8 {
        match self {
            HoldingCategory::BasketEtf => 1,
            HoldingCategory::SingleEtf => 2,
            HoldingCategory::DoubleLongEtf => 4,
            HoldingCategory::Security => 3,
            HoldingCategory::AutoAdded => 2,
            HoldingCategory::Misc => 2,
        }
    }

    /// True for categories restricted by the cap table.
    pub fn is_capped(&self) -> bool {
        CAPPED_CATEGORIES.contains(self)
    }
}

impl fmt::Display for HoldingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HoldingCategory {
    type Err = RiskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "basket_etf" => Ok(HoldingCategory::BasketEtf),
            "single_etf" => Ok(HoldingCategory::SingleEtf),
            "double_long_etf" | "leveraged_etf" => Ok(HoldingCategory::DoubleLongEtf),
            "security" => Ok(HoldingCategory::Security),
            "auto_added" => Ok(HoldingCategory::AutoAdded),
            "misc" => Ok(HoldingCategory::Misc),
            _ => Err(RiskError::UnknownCategory(s.to_string())),
        }
    }
}

// =============================================================================
// Caps
// =============================================================================

/// Maximum aggregate percentage for each capped category.
///
/// Used both for a row of the cap table and for blended caps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCaps {
    pub double_long_etf: Decimal,
    pub security: Decimal,
    pub single_etf: Decimal,
}

/// Caps blended across tiers by a `RiskTierAllocation`.
pub type BlendedCaps = CategoryCaps;

impl CategoryCaps {
    /// Builds caps from whole percentages ordered as `CAPPED_CATEGORIES`.
    pub fn from_percents(percents: [i64; 3]) -> Self {
        Self {
            double_long_etf: Decimal::from(percents[0]),
            security: Decimal::from(percents[1]),
            single_etf: Decimal::from(percents[2]),
        }
    }

    /// Cap for `category`, or `None` when the category is unconstrained.
    pub fn get(&self, category: HoldingCategory) -> Option<Decimal> {
        match category {
            HoldingCategory::DoubleLongEtf => Some(self.double_long_etf),
            HoldingCategory::Security => Some(self.security),
            HoldingCategory::SingleEtf => Some(self.single_etf),
            HoldingCategory::BasketEtf | HoldingCategory::AutoAdded | HoldingCategory::Misc => {
                None
            }
        }
    }

    /// Iterates `(category, cap)` in `CAPPED_CATEGORIES` order.
    pub fn iter(&self) -> impl Iterator<Item = (HoldingCategory, Decimal)> + '_ {
        CAPPED_CATEGORIES
            .iter()
            .filter_map(move |category| self.get(*category).map(|cap| (*category, cap)))
    }
}

/// Per-tier cap table. Static reference data, overridable through
/// `RiskLimitConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCapTable {
    pub low: CategoryCaps,
    pub low_medium: CategoryCaps,
    pub medium: CategoryCaps,
    pub medium_high: CategoryCaps,
    pub high: CategoryCaps,
}

impl CategoryCapTable {
    pub fn row(&self, tier: RiskTier) -> &CategoryCaps {
        match tier {
            RiskTier::Low => &self.low,
            RiskTier::LowMedium => &self.low_medium,
            RiskTier::Medium => &self.medium,
            RiskTier::MediumHigh => &self.medium_high,
            RiskTier::High => &self.high,
        }
    }
}

impl Default for CategoryCapTable {
    fn default() -> Self {
        let row = |tier: RiskTier| CategoryCaps::from_percents(DEFAULT_TIER_CAPS[tier.index()]);
        Self {
            low: row(RiskTier::Low),
            low_medium: row(RiskTier::LowMedium),
            medium: row(RiskTier::Medium),
            medium_high: row(RiskTier::MediumHigh),
            high: row(RiskTier::High),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// A candidate target allocation for one holding category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAllocationLine {
    pub category: HoldingCategory,
    pub target_percentage: Decimal,
}

impl TargetAllocationLine {
    pub fn new(category: HoldingCategory, target_percentage: Decimal) -> Self {
        Self {
            category,
            target_percentage,
        }
    }
}

/// A target allocation line whose category is an unparsed tag, as stored by
/// the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTargetLine {
    pub category: String,
    pub target_percentage: Decimal,
}

impl RawTargetLine {
    /// Parses the category tag into a typed line.
    pub fn parse(&self) -> std::result::Result<TargetAllocationLine, RiskError> {
        let category = self.category.parse()?;
        Ok(TargetAllocationLine::new(category, self.target_percentage))
    }
}

/// Limit check result for one capped category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLimitCheck {
    pub category: HoldingCategory,
    /// Sum of all target lines in this category
    pub current_percentage: Decimal,
    /// Blended cap, rounded
    pub max_allowed: Decimal,
    /// Amount above the cap; zero for warnings
    pub exceeded_by: Decimal,
}

/// Result of validating a set of target allocations against blended caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub violations: Vec<CategoryLimitCheck>,
    pub warnings: Vec<CategoryLimitCheck>,
    /// Unrounded caps the lines were checked against
    pub blended_caps: BlendedCaps,
}

impl ValidationOutcome {
    /// Returns the violation or warning reported for `category`, if any.
    pub fn limit_for(&self, category: HoldingCategory) -> Option<&CategoryLimitCheck> {
        self.violations
            .iter()
            .chain(self.warnings.iter())
            .find(|check| check.category == category)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// =============================================================================
// Risk Score
// =============================================================================

/// Five risk bands a score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskBand {
    VeryLow,
    Low,
    Moderate,
    ModeratelyHigh,
    High,
}

impl RiskBand {
    /// Finds the band for `score`. Upper bounds are inclusive; anything above
    /// 3 is `High`.
    pub fn from_score(score: Decimal) -> Self {
        RISK_BAND_UPPER_BOUNDS_TENTHS
            .iter()
            .find(|(upper_tenths, _)| score <= Decimal::new(*upper_tenths, 1))
            .map(|(_, band)| *band)
            .unwrap_or(RiskBand::High)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::VeryLow => "Very Low Risk",
            RiskBand::Low => "Low Risk",
            RiskBand::Moderate => "Moderate Risk",
            RiskBand::ModeratelyHigh => "Moderately High Risk",
            RiskBand::High => "High Risk",
        }
    }

    /// Hex color used when rendering this band.
    pub fn color(&self) -> &'static str {
        match self {
            RiskBand::VeryLow => "#22c55e",
            RiskBand::Low => "#84cc16",
            RiskBand::Moderate => "#eab308",
            RiskBand::ModeratelyHigh => "#f97316",
            RiskBand::High => "#ef4444",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Score of a holding set together with its band.
///
/// `band` is `None` when the holdings carry no weight, in which case the
/// score is 0 and means "undetermined" rather than lowest risk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: Decimal,
    pub band: Option<RiskBand>,
    pub label: &'static str,
    pub color: &'static str,
}

impl RiskAssessment {
    pub fn undetermined() -> Self {
        Self {
            score: Decimal::ZERO,
            band: None,
            label: UNDETERMINED_RISK_LABEL,
            color: UNDETERMINED_RISK_COLOR,
        }
    }

    pub fn from_score(score: Decimal) -> Self {
        let band = RiskBand::from_score(score);
        Self {
            score,
            band: Some(band),
            label: band.label(),
            color: band.color(),
        }
    }

    pub fn is_determined(&self) -> bool {
        self.band.is_some()
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the risk limit engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskLimitConfig {
    /// Cap table blended by tier allocation
    pub cap_table: CategoryCapTable,

    /// Fraction of a cap at which a warning is raised (default: 0.8)
    pub warning_ratio: Decimal,

    /// Decimal places blended caps are rounded to (default: 1)
    pub cap_decimal_places: u32,
}

impl Default for RiskLimitConfig {
    fn default() -> Self {
        Self {
            cap_table: CategoryCapTable::default(),
            warning_ratio: Decimal::new(DEFAULT_WARNING_RATIO_PERCENT, 2),
            cap_decimal_places: CAP_DECIMAL_PRECISION,
        }
    }
}

impl RiskLimitConfig {
    /// Checks that caps are non-negative, the warning ratio lies in (0, 1]
    /// and the rounding precision is supported.
    pub fn validate(&self) -> std::result::Result<(), RiskError> {
        for tier in RiskTier::ALL {
            for (category, cap) in self.cap_table.row(tier).iter() {
                if cap < Decimal::ZERO {
                    return Err(RiskError::invalid_config(format!(
                        "cap for {} at tier {} is negative ({})",
                        category,
                        tier.as_str(),
                        cap
                    )));
                }
            }
        }

        if self.warning_ratio <= Decimal::ZERO || self.warning_ratio > Decimal::ONE {
            return Err(RiskError::invalid_config(format!(
                "warning ratio must be in (0, 1], got {}",
                self.warning_ratio
            )));
        }

        if self.cap_decimal_places > MAX_CAP_DECIMAL_PRECISION {
            return Err(RiskError::invalid_config(format!(
                "cap precision must be at most {} decimal places, got {}",
                MAX_CAP_DECIMAL_PRECISION, self.cap_decimal_places
            )));
        }

        Ok(())
    }

    /// Loads a configuration document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
