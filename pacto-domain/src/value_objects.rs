//! Value Objects for the Pacto domain
//!
//! Small, validated primitives. Parsing from client-supplied strings
//! happens here so the engine only ever sees well-formed values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain errors for input validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Participant id is not one of the two known participants
    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),

    /// Favor type id is not in the catalog
    #[error("Unknown favor type: {0}")]
    UnknownFavorType(String),

    /// Reward type id is not in the catalog
    #[error("Unknown reward type: {0}")]
    UnknownRewardType(String),

    /// Review decision is neither approve nor reject
    #[error("Invalid decision: {0}")]
    InvalidDecision(String),

    /// Record is no longer pending
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

// =============================================================================
// Participant
// =============================================================================

/// One of the two fixed participants of the pact
///
/// # Invariants
/// - Exactly two variants; `other()` is total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Participant {
    /// Marcos
    Marcos,
    /// Sofi
    Sofi,
}

impl Participant {
    /// Both participants, in a stable order
    pub const ALL: [Participant; 2] = [Participant::Marcos, Participant::Sofi];

    /// The counterpart of this participant
    pub fn other(self) -> Self {
        match self {
            Participant::Marcos => Participant::Sofi,
            Participant::Sofi => Participant::Marcos,
        }
    }

    /// Wire identifier (e.g., "marcos")
    pub fn as_str(self) -> &'static str {
        match self {
            Participant::Marcos => "marcos",
            Participant::Sofi => "sofi",
        }
    }
}

impl FromStr for Participant {
    type Err = DomainError;

    /// Parse a participant id
    ///
    /// # Errors
    /// Returns `DomainError::InvalidParticipant` for anything but the two exact ids
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "marcos" => Ok(Participant::Marcos),
            "sofi" => Ok(Participant::Sofi),
            other => Err(DomainError::InvalidParticipant(other.to_string())),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Review Decision
// =============================================================================

/// Outcome chosen by the reviewing participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    /// Accept the record
    Approve,
    /// Refuse the record
    Reject,
}

impl ReviewDecision {
    /// Lenient parse used for redemption reviews: only "approve" approves,
    /// every other action rejects.
    pub fn approve_or_reject(action: &str) -> Self {
        if action == "approve" {
            ReviewDecision::Approve
        } else {
            ReviewDecision::Reject
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = DomainError;

    /// Strict parse used for favor reviews
    ///
    /// # Errors
    /// Returns `DomainError::InvalidDecision` unless the action is "approve" or "reject"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(ReviewDecision::Approve),
            "reject" => Ok(ReviewDecision::Reject),
            other => Err(DomainError::InvalidDecision(other.to_string())),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
