use super::alerts_model::{AccountSnapshot, ClassificationResult, SignalDirection};

/// Trait defining the contract for classifying accounts affected by an alert.
pub trait DeviationClassifierTrait: Send + Sync {
    /// Classifies every account holding or targeting `ticker` and orders the
    /// result for operator review. Accounts with neither are left out.
    fn classify(
        &self,
        ticker: &str,
        direction: SignalDirection,
        accounts: &[AccountSnapshot],
    ) -> ClassificationResult;
}
