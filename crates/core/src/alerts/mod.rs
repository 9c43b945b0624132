//! Trading alerts module - classifies the accounts affected by a signal.

mod alerts_constants;
mod alerts_errors;
mod alerts_model;
mod alerts_traits;
mod deviation_classifier;


pub use alerts_constants::*;
pub use alerts_errors::AlertError;
pub use alerts_model::{
    AccountSnapshot, AffectedAccount, ClassificationResult, DeviationConfig, DeviationStatus,
    PositionSnapshot, SignalDirection, StatusCounts, TickerTarget,
};
pub use alerts_traits::DeviationClassifierTrait;
pub use deviation_classifier::{
    classify_accounts, compare_priority, normalize_ticker, DeviationClassifier,
};
