//! Trading alert domain models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::alerts_errors::AlertError;
use crate::errors::Result;

// =============================================================================
// Signal Direction
// =============================================================================

/// Direction of an incoming trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalDirection {
    #[serde(alias = "buy")]
    Buy,
    #[serde(alias = "sell")]
    Sell,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Sell => "SELL",
        }
    }

    /// Status that sorts first for this direction: underweight accounts are
    /// the best buy candidates, overweight accounts the best sell candidates.
    pub fn priority_status(&self) -> DeviationStatus {
        match self {
            SignalDirection::Buy => DeviationStatus::Under,
            SignalDirection::Sell => DeviationStatus::Over,
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SignalDirection {
    type Err = AlertError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "long" => Ok(SignalDirection::Buy),
            "sell" | "short" => Ok(SignalDirection::Sell),
            _ => Err(AlertError::UnknownSignal(s.to_string())),
        }
    }
}

// =============================================================================
// Deviation Status
// =============================================================================

/// Actual-versus-target classification of one account for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviationStatus {
    Under,
    Over,
    OnTarget,
    /// Position held, no target set
    NoTarget,
    /// Target set, but no portfolio value to measure against
    ZeroBalance,
}

impl DeviationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviationStatus::Under => "under",
            DeviationStatus::Over => "over",
            DeviationStatus::OnTarget => "on-target",
            DeviationStatus::NoTarget => "no-target",
            DeviationStatus::ZeroBalance => "zero-balance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviationStatus::Under => "Under Target",
            DeviationStatus::Over => "Over Target",
            DeviationStatus::OnTarget => "On Target",
            DeviationStatus::NoTarget => "No Target",
            DeviationStatus::ZeroBalance => "Zero Balance",
        }
    }
}

impl fmt::Display for DeviationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// A position lot held by an account, valued by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSnapshot {
    pub ticker: String,
    pub market_value: Decimal,
}

/// A target allocation naming a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerTarget {
    pub ticker: String,
    pub target_percentage: Decimal,
}

/// An account joined with its household, positions and target allocations,
/// as loaded by the host application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub account_id: String,
    pub account_type: String,
    pub owner_name: String,
    pub household_id: String,
    pub household_name: String,
    pub household_category: Option<String>,
    /// Total account value
    pub portfolio_value: Decimal,
    #[serde(default)]
    pub positions: Vec<PositionSnapshot>,
    #[serde(default)]
    pub targets: Vec<TickerTarget>,
}

// =============================================================================
// Outputs
// =============================================================================

/// One account affected by an alert, with its deviation for the ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedAccount {
    pub account_id: String,
    pub account_type: String,
    pub owner_name: String,
    pub household_id: String,
    pub household_name: String,
    pub household_category: Option<String>,
    /// Value of the position in the ticker (0 when only targeted)
    pub current_value: Decimal,
    pub portfolio_value: Decimal,
    pub actual_percentage: Decimal,
    pub target_percentage: Option<Decimal>,
    /// actual - target, when both are measurable
    pub variance: Option<Decimal>,
    pub status: DeviationStatus,
}

/// Number of affected accounts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub under: usize,
    pub over: usize,
    pub on_target: usize,
    pub no_target: usize,
    pub zero_balance: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: DeviationStatus) {
        match status {
            DeviationStatus::Under => self.under += 1,
            DeviationStatus::Over => self.over += 1,
            DeviationStatus::OnTarget => self.on_target += 1,
            DeviationStatus::NoTarget => self.no_target += 1,
            DeviationStatus::ZeroBalance => self.zero_balance += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.under + self.over + self.on_target + self.no_target + self.zero_balance
    }
}

/// Partitioned, priority-ordered accounts affected by one alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// Normalized ticker (trimmed, upper-case)
    pub ticker: String,
    pub direction: SignalDirection,
    /// Accounts with a measurable balance, priority status first
    pub active: Vec<AffectedAccount>,
    /// Accounts with a target but no portfolio value, in input order
    pub zero_balance: Vec<AffectedAccount>,
}

impl ClassificationResult {
    /// All affected accounts in rendered order: active, then zero-balance.
    pub fn affected(&self) -> impl Iterator<Item = &AffectedAccount> {
        self.active.iter().chain(self.zero_balance.iter())
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.zero_balance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Leading active accounts carrying the direction's priority status.
    pub fn prioritized(&self) -> &[AffectedAccount] {
        let priority = self.direction.priority_status();
        let count = self
            .active
            .iter()
            .take_while(|account| account.status == priority)
            .count();
        &self.active[..count]
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for account in self.affected() {
            counts.record(account.status);
        }
        counts
    }

    /// Annotation for the zero-balance partition, when it is non-empty.
    pub fn zero_balance_note(&self) -> Option<&'static str> {
        if self.zero_balance.is_empty() {
            None
        } else {
            Some(super::alerts_constants::ZERO_BALANCE_NOTE)
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the deviation classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviationConfig {
    /// Largest |actual - target| still reported as on-target (default: 0,
    /// exact equality)
    pub on_target_tolerance: Decimal,
}

impl DeviationConfig {
    pub fn validate(&self) -> std::result::Result<(), AlertError> {
        if self.on_target_tolerance < Decimal::ZERO {
            return Err(AlertError::InvalidConfig(format!(
                "on-target tolerance must not be negative, got {}",
                self.on_target_tolerance
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
