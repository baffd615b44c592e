//! Ledger Service: runs one engine operation per request.
//!
//! Each command follows the same shape:
//!
//! ```text
//! parse input → store.load() → engine op (with clock.now()) → store.save()
//! ```
//!
//! Validation always happens before the save, so a refused command never
//! writes anything.

use std::sync::Arc;

use tracing::{error, info, warn};

use pacto_domain::{FavorStatus, Participant, RecordId, RedemptionStatus, ReviewDecision};
use pacto_engine::{CatalogView, LedgerEngine, StatusReport};
use pacto_store::LedgerStore;

use crate::clock::Clock;
use crate::error::{DaemonError, DaemonResult};

// =============================================================================
// Ledger Service
// =============================================================================

/// Orchestrates load → engine → save around each request.
pub struct LedgerService<S: LedgerStore + 'static> {
    /// Rule engine
    engine: LedgerEngine,
    /// Ledger persistence
    store: Arc<S>,
    /// Source of "now"
    clock: Arc<dyn Clock>,
}

impl<S: LedgerStore + 'static> LedgerService<S> {
    /// Create a new ledger service.
    pub fn new(engine: LedgerEngine, store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            engine,
            store,
            clock,
        }
    }

    /// Load the ledger once so a fresh install gets its empty document.
    /// Returns the number of records found.
    pub async fn bootstrap(&self) -> DaemonResult<usize> {
        let ledger = self.store.load().await.map_err(storage_failure)?;
        Ok(ledger.record_count())
    }

    /// Favor and reward catalogs.
    pub fn config(&self) -> CatalogView {
        self.engine.config()
    }

    /// Status report for `user`.
    pub async fn status(&self, user: &str) -> DaemonResult<StatusReport> {
        let user: Participant = user.parse()?;
        let ledger = self.store.load().await.map_err(storage_failure)?;
        Ok(self.engine.status(&ledger, user, self.clock.now()))
    }

    /// Log a favor for `user`.
    pub async fn submit_favor(&self, user: &str, favor_type_id: &str) -> DaemonResult<RecordId> {
        let user: Participant = user.parse()?;
        let mut ledger = self.store.load().await.map_err(storage_failure)?;

        let id = self
            .engine
            .submit_favor(&mut ledger, user, favor_type_id, self.clock.now())
            .map_err(|e| refused("submit_favor", user, e))?;

        self.store.save(&ledger).await.map_err(storage_failure)?;
        info!(participant = %user, record_id = id, favor_type = favor_type_id, "Favor submitted");
        Ok(id)
    }

    /// Approve or dispute one of the other participant's favors.
    ///
    /// `action` must be "approve" or "reject".
    pub async fn review_favor(
        &self,
        reviewer: &str,
        id: RecordId,
        action: &str,
    ) -> DaemonResult<FavorStatus> {
        let reviewer: Participant = reviewer.parse()?;
        let decision: ReviewDecision = action.parse()?;
        let mut ledger = self.store.load().await.map_err(storage_failure)?;

        let status = self
            .engine
            .review_favor(&mut ledger, reviewer, id, decision)
            .map_err(|e| refused("review_favor", reviewer, e))?;

        self.store.save(&ledger).await.map_err(storage_failure)?;
        info!(participant = %reviewer, record_id = id, %status, "Favor reviewed");
        Ok(status)
    }

    /// Request a reward for `user`.
    pub async fn submit_redemption(&self, user: &str, reward_type_id: &str) -> DaemonResult<RecordId> {
        let user: Participant = user.parse()?;
        let mut ledger = self.store.load().await.map_err(storage_failure)?;

        let id = self
            .engine
            .submit_redemption(&mut ledger, user, reward_type_id, self.clock.now())
            .map_err(|e| refused("submit_redemption", user, e))?;

        self.store.save(&ledger).await.map_err(storage_failure)?;
        info!(participant = %user, record_id = id, reward_type = reward_type_id, "Redemption submitted");
        Ok(id)
    }

    /// Approve or reject one of the other participant's redemptions.
    ///
    /// Only "approve" approves; any other action rejects.
    pub async fn review_redemption(
        &self,
        reviewer: &str,
        id: RecordId,
        action: &str,
    ) -> DaemonResult<RedemptionStatus> {
        let reviewer: Participant = reviewer.parse()?;
        let decision = ReviewDecision::approve_or_reject(action);
        let mut ledger = self.store.load().await.map_err(storage_failure)?;

        let status = self
            .engine
            .review_redemption(&mut ledger, reviewer, id, decision)
            .map_err(|e| refused("review_redemption", reviewer, e))?;

        self.store.save(&ledger).await.map_err(storage_failure)?;
        info!(participant = %reviewer, record_id = id, %status, "Redemption reviewed");
        Ok(status)
    }
}

fn refused(operation: &'static str, participant: Participant, err: pacto_engine::EngineError) -> DaemonError {
    warn!(operation, %participant, error = %err, "Operation refused");
    err.into()
}

fn storage_failure(err: pacto_store::StoreError) -> DaemonError {
    error!(error = %err, "Ledger storage failure");
    err.into()
}

// =============================================================================
// Tests
// =============================================================================
