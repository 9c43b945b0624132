//! Deviation classification for trading alerts.
//!
//! Given a ticker and a signal direction, each account that holds or targets
//! the ticker is classified by how far its actual weight sits from its
//! target. Accounts with no portfolio value are split off, and the remaining
//! accounts are ordered so the best candidates for the signal come first.

use std::cmp::Ordering;

use log::debug;
use rust_decimal::Decimal;

use crate::constants::FULL_ALLOCATION_PERCENT;
use crate::errors::Result;

use super::alerts_model::{
    AccountSnapshot, AffectedAccount, ClassificationResult, DeviationConfig, DeviationStatus,
    SignalDirection,
};
use super::alerts_traits::DeviationClassifierTrait;

/// Classifies accounts against an alert's ticker.
#[derive(Debug, Clone, Default)]
pub struct DeviationClassifier {
    config: DeviationConfig,
}

impl DeviationClassifier {
    /// Creates a classifier after validating `config`.
    pub fn new(config: DeviationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Classifies a single account, or returns `None` when it neither holds
    /// nor targets the ticker.
    pub fn classify_account(
        &self,
        ticker_key: &str,
        account: &AccountSnapshot,
    ) -> Option<AffectedAccount> {
        let position_value = sum_matching(
            account
                .positions
                .iter()
                .map(|p| (p.ticker.as_str(), p.market_value)),
            ticker_key,
        );
        let target_percentage = sum_matching(
            account
                .targets
                .iter()
                .map(|t| (t.ticker.as_str(), t.target_percentage)),
            ticker_key,
        );

        if position_value.is_none() && target_percentage.is_none() {
            return None;
        }

        let current_value = position_value.unwrap_or_default();
        let has_balance = account.portfolio_value > Decimal::ZERO;

        let (actual_percentage, variance, status) = match target_percentage {
            // No denominator: checked before any percentage arithmetic.
            Some(_) if !has_balance => (Decimal::ZERO, None, DeviationStatus::ZeroBalance),
            None => {
                let actual = if has_balance {
                    percentage_of(current_value, account.portfolio_value)
                } else {
                    Decimal::ZERO
                };
                (actual, None, DeviationStatus::NoTarget)
            }
            Some(target) => {
                let actual = percentage_of(current_value, account.portfolio_value);
                let variance = actual.saturating_sub(target);
                (actual, Some(variance), self.status_for_variance(variance))
            }
        };

        Some(AffectedAccount {
            account_id: account.account_id.clone(),
            account_type: account.account_type.clone(),
            owner_name: account.owner_name.clone(),
            household_id: account.household_id.clone(),
            household_name: account.household_name.clone(),
            household_category: account.household_category.clone(),
            current_value,
            portfolio_value: account.portfolio_value,
            actual_percentage,
            target_percentage,
            variance,
            status,
        })
    }

    fn status_for_variance(&self, variance: Decimal) -> DeviationStatus {
        if variance.abs() <= self.config.on_target_tolerance {
            DeviationStatus::OnTarget
        } else if variance < Decimal::ZERO {
            DeviationStatus::Under
        } else {
            DeviationStatus::Over
        }
    }
}

impl DeviationClassifierTrait for DeviationClassifier {
    fn classify(
        &self,
        ticker: &str,
        direction: SignalDirection,
        accounts: &[AccountSnapshot],
    ) -> ClassificationResult {
        let ticker_key = normalize_ticker(ticker);

        let (zero_balance, mut active): (Vec<_>, Vec<_>) = accounts
            .iter()
            .filter_map(|account| self.classify_account(&ticker_key, account))
            .partition(|affected| affected.status == DeviationStatus::ZeroBalance);

        let priority = direction.priority_status();
        active.sort_by(|a, b| compare_priority(a, b, priority));

        debug!(
            "Classified {} {} alert: {} active, {} zero-balance of {} candidate accounts",
            ticker_key,
            direction,
            active.len(),
            zero_balance.len(),
            accounts.len()
        );

        ClassificationResult {
            ticker: ticker_key,
            direction,
            active,
            zero_balance,
        }
    }
}

/// Classifies accounts with the default (exact equality) configuration.
pub fn classify_accounts(
    ticker: &str,
    direction: SignalDirection,
    accounts: &[AccountSnapshot],
) -> ClassificationResult {
    DeviationClassifier::default().classify(ticker, direction, accounts)
}

/// Orders accounts with the priority status ahead of all others. Every other
/// pair compares equal, so a stable sort keeps their input order.
pub fn compare_priority(
    a: &AffectedAccount,
    b: &AffectedAccount,
    priority: DeviationStatus,
) -> Ordering {
    match (a.status == priority, b.status == priority) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Canonical form used to match tickers across positions and targets.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_ascii_uppercase()
}

/// Sums the values whose ticker matches, or `None` when nothing matches.
fn sum_matching<'a>(
    entries: impl Iterator<Item = (&'a str, Decimal)>,
    ticker_key: &str,
) -> Option<Decimal> {
    entries
        .filter(|(ticker, _)| normalize_ticker(ticker) == ticker_key)
        .map(|(_, value)| value)
        .reduce(Decimal::saturating_add)
}

/// `value` as a percentage of `total`, saturating at the Decimal bounds when
/// the ratio does not fit (e.g. a large position in a near-empty account).
fn percentage_of(value: Decimal, total: Decimal) -> Decimal {
    value
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::from(FULL_ALLOCATION_PERCENT)))
        .unwrap_or_else(|| {
            if value.is_sign_negative() != total.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        })
}
