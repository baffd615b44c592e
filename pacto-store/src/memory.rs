//! In-memory store implementation
//!
//! Used for testing and `PACTO_ENV=test` without touching the filesystem.
//! Thread-safe using RwLock for concurrent access.

use crate::error::StoreError;
use crate::repository::LedgerStore;
use async_trait::async_trait;
use pacto_domain::Ledger;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

/// In-memory ledger document
pub struct MemoryStore {
    ledger: RwLock<Option<Ledger>>,
    saves: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Create a store with no document yet
    pub fn new() -> Self {
        Self {
            ledger: RwLock::new(None),
            saves: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Create a store already holding `ledger`
    pub fn with_ledger(ledger: Ledger) -> Self {
        let store = Self::new();
        *store.ledger.write().unwrap_or_else(|e| e.into_inner()) = Some(ledger);
        store
    }

    /// Current document, if one has been written
    pub fn snapshot(&self) -> Option<Ledger> {
        self.ledger.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of successful saves (bootstrap included)
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every subsequent load/save fail (useful for tests)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("memory store switched off"));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn load(&self) -> Result<Ledger, StoreError> {
        self.check_available()?;

        if let Some(ledger) = self.snapshot() {
            return Ok(ledger);
        }

        let ledger = Ledger::new();
        self.save(&ledger).await?;
        Ok(ledger)
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        self.check_available()?;

        let mut slot = self
            .ledger
            .write()
            .map_err(|_| StoreError::unavailable("memory store lock poisoned"))?;
        *slot = Some(ledger.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
