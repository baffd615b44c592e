//! Domain Entities for Pacto
//!
//! Favor and redemption records with their lifecycles, and the ledger
//! document that owns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{FavorType, RewardType};
use crate::value_objects::{DomainError, Participant, ReviewDecision};

/// Record identifier, shared by favors and redemptions
pub type RecordId = u64;

// =============================================================================
// Favor
// =============================================================================

/// Lifecycle of a favor record
///
/// `Pending` → `Approved` | `Disputed` (| `Rejected`, kept for stored data).
/// Every non-pending state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavorStatus {
    Pending,
    Approved,
    Rejected,
    /// Refused by the reviewer; settled by mediation outside the ledger
    Disputed,
}

impl FavorStatus {
    /// State reached after the reviewer decides
    pub fn after_review(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approve => FavorStatus::Approved,
            ReviewDecision::Reject => FavorStatus::Disputed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FavorStatus::Pending => "pending",
            FavorStatus::Approved => "approved",
            FavorStatus::Rejected => "rejected",
            FavorStatus::Disputed => "disputed",
        }
    }
}

impl fmt::Display for FavorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logged favor awaiting (or past) the other participant's judgment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavorRecord {
    pub id: RecordId,
    pub user: Participant,
    #[serde(rename = "gestoId")]
    pub favor_type_id: String,
    #[serde(rename = "gestoName", default)]
    pub favor_name: String,
    /// Copied from the catalog at creation
    pub points: u32,
    pub timestamp: DateTime<Utc>,
    pub status: FavorStatus,
}

impl FavorRecord {
    /// Create a pending favor for `user`
    pub fn new(id: RecordId, user: Participant, favor: &FavorType, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user,
            favor_type_id: favor.id.to_string(),
            favor_name: favor.name.to_string(),
            points: favor.points,
            timestamp: now,
            status: FavorStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == FavorStatus::Pending
    }

    /// Apply the reviewer's decision
    ///
    /// # Errors
    /// Returns `DomainError::InvalidStateTransition` if the favor is already resolved
    pub fn review(&mut self, decision: ReviewDecision) -> Result<FavorStatus, DomainError> {
        if !self.is_pending() {
            return Err(DomainError::InvalidStateTransition(format!(
                "favor {} already {}",
                self.id, self.status
            )));
        }
        self.status = FavorStatus::after_review(decision);
        Ok(self.status)
    }
}

// =============================================================================
// Redemption
// =============================================================================

/// Lifecycle of a redemption record
///
/// `Pending` → `Approved` | `Rejected`, both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedemptionStatus {
    Pending,
    Approved,
    Rejected,
}

impl RedemptionStatus {
    /// State reached after the reviewer decides
    pub fn after_review(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approve => RedemptionStatus::Approved,
            ReviewDecision::Reject => RedemptionStatus::Rejected,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RedemptionStatus::Pending => "pending",
            RedemptionStatus::Approved => "approved",
            RedemptionStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RedemptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to spend points on a reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionRecord {
    pub id: RecordId,
    pub user: Participant,
    #[serde(rename = "canjeId")]
    pub reward_type_id: String,
    #[serde(rename = "canjeName", default)]
    pub reward_name: String,
    /// Copied from the catalog at creation
    pub cost: u32,
    pub timestamp: DateTime<Utc>,
    pub status: RedemptionStatus,
}

impl RedemptionRecord {
    /// Create a pending redemption for `user`
    pub fn new(id: RecordId, user: Participant, reward: &RewardType, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user,
            reward_type_id: reward.id.to_string(),
            reward_name: reward.name.to_string(),
            cost: reward.cost,
            timestamp: now,
            status: RedemptionStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RedemptionStatus::Pending
    }

    /// Apply the reviewer's decision
    ///
    /// # Errors
    /// Returns `DomainError::InvalidStateTransition` if the redemption is already resolved
    pub fn review(&mut self, decision: ReviewDecision) -> Result<RedemptionStatus, DomainError> {
        if !self.is_pending() {
            return Err(DomainError::InvalidStateTransition(format!(
                "redemption {} already {}",
                self.id, self.status
            )));
        }
        self.status = RedemptionStatus::after_review(decision);
        Ok(self.status)
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// The whole persisted state: both record sequences plus the id counter.
///
/// Balances are derived on demand and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(rename = "gestos", default)]
    pub favors: Vec<FavorRecord>,
    #[serde(rename = "canjes", default)]
    pub redemptions: Vec<RedemptionRecord>,
    /// Last id handed out; shared by both record kinds
    #[serde(default)]
    pub counter: RecordId,
}

impl Ledger {
    /// Empty ledger with the counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the shared counter and return the new id
    pub fn next_id(&mut self) -> RecordId {
        self.counter += 1;
        self.counter
    }

    /// Sum of points of `user`'s approved favors
    pub fn total_earned(&self, user: Participant) -> i64 {
        self.favors
            .iter()
            .filter(|f| f.user == user && f.status == FavorStatus::Approved)
            .map(|f| i64::from(f.points))
            .sum()
    }

    /// Sum of costs of `user`'s approved redemptions
    pub fn total_spent(&self, user: Participant) -> i64 {
        self.redemptions
            .iter()
            .filter(|r| r.user == user && r.status == RedemptionStatus::Approved)
            .map(|r| i64::from(r.cost))
            .sum()
    }

    /// Spendable points: approved earned minus approved spent
    pub fn balance(&self, user: Participant) -> i64 {
        self.total_earned(user) - self.total_spent(user)
    }

    /// Total number of records of both kinds
    pub fn record_count(&self) -> usize {
        self.favors.len() + self.redemptions.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
