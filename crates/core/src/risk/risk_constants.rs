//! Static reference data for risk-tier limits and scoring.

use super::risk_model::{HoldingCategory, RiskBand};

/// Categories carrying an enforced cap, in the order limits are reported.
pub const CAPPED_CATEGORIES: [HoldingCategory; 3] = [
    HoldingCategory::DoubleLongEtf,
    HoldingCategory::Security,
    HoldingCategory::SingleEtf,
];

/// Maximum aggregate percentage per capped category for each risk tier.
///
/// Rows follow `RiskTier::ALL` (low to high); columns follow
/// `CAPPED_CATEGORIES` (leveraged ETF, security, single ETF).
pub const DEFAULT_TIER_CAPS: [[i64; 3]; 5] = [
    [0, 10, 30],
    [5, 20, 40],
    [10, 30, 50],
    [20, 40, 60],
    [30, 50, 75],
];

/// Risk bands by inclusive upper score bound, expressed in tenths.
/// Scores above the last bound fall into `RiskBand::High`.
pub const RISK_BAND_UPPER_BOUNDS_TENTHS: [(i64, RiskBand); 4] = [
    (15, RiskBand::VeryLow),
    (20, RiskBand::Low),
    (25, RiskBand::Moderate),
    (30, RiskBand::ModeratelyHigh),
];

/// Label reported when a holding set has no weight to score.
pub const UNDETERMINED_RISK_LABEL: &str = "Undetermined";

/// Color reported alongside `UNDETERMINED_RISK_LABEL`.
pub const UNDETERMINED_RISK_COLOR: &str = "#878580";
