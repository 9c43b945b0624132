/// Percentage a complete allocation sums to
pub const FULL_ALLOCATION_PERCENT: i64 = 100;

/// Decimal places blended caps are rounded to before comparison
pub const CAP_DECIMAL_PRECISION: u32 = 1;

/// Upper bound for a configured cap precision
pub const MAX_CAP_DECIMAL_PRECISION: u32 = 6;

/// Share of a cap (in percent) at which a category starts producing a warning
pub const DEFAULT_WARNING_RATIO_PERCENT: i64 = 80;
