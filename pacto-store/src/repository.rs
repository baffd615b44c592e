//! Repository trait definition (Port)
//!
//! The whole ledger is one document: it is loaded at the start of a
//! command and overwritten at the end. Implementations can be a JSON file,
//! in-memory, or anything else holding a single document.

use async_trait::async_trait;
use pacto_domain::Ledger;

use crate::error::StoreError;

/// Storage for the ledger document
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Load the ledger.
    ///
    /// If no document exists yet, an empty ledger is created, persisted and
    /// returned.
    async fn load(&self) -> Result<Ledger, StoreError>;

    /// Overwrite the stored ledger.
    async fn save(&self, ledger: &Ledger) -> Result<(), StoreError>;
}
