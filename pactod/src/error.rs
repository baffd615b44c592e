//! Daemon error types.

use pacto_domain::DomainError;
use pacto_engine::EngineError;
use pacto_store::StoreError;
use thiserror::Error;

/// Daemon-level errors.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Input validation error
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Business rule refused the operation
    #[error("{0}")]
    Engine(#[from] EngineError),

    /// Ledger could not be loaded or saved
    #[error("Storage unavailable: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DaemonError {
    /// Whether the ledger store failed (the only potentially fatal kind)
    pub fn is_storage(&self) -> bool {
        matches!(self, DaemonError::Store(_))
    }
}

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;
