//! Engine error types.

use pacto_domain::{DomainError, RecordId};
use thiserror::Error;

/// Errors returned by ledger operations.
///
/// Every write validates fully before mutating, so an error always means
/// the ledger is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Input validation failed
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// No pending record with this id belongs to the other participant
    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: &'static str, id: RecordId },

    /// Participant already created the maximum redemptions for the local day
    #[error("Daily redemption limit reached: at most {limit} per day")]
    DailyRedemptionLimitExceeded { limit: usize },

    /// Balance does not cover the reward cost
    #[error("Insufficient points: {available} available, {required} required")]
    InsufficientPoints { available: i64, required: u32 },
}

impl EngineError {
    pub(crate) fn favor_not_found(id: RecordId) -> Self {
        Self::RecordNotFound { kind: "Favor", id }
    }

    pub(crate) fn redemption_not_found(id: RecordId) -> Self {
        Self::RecordNotFound { kind: "Redemption", id }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
