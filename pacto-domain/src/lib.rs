//! Pacto Domain Layer
//!
//! Pure domain types with zero I/O dependencies.
//! Contains participants, catalogs, records, the ledger document and
//! local-time rules.

#![warn(clippy::all)]

// Public modules
pub mod catalog;
pub mod entities;
pub mod schedule;
pub mod value_objects;

// Re-export commonly used types
pub use catalog::{favor_type, reward_type, FavorType, RewardType, FAVOR_TYPES, REWARD_TYPES};
pub use entities::{
    FavorRecord, FavorStatus, Ledger, RecordId, RedemptionRecord, RedemptionStatus,
};
pub use schedule::{is_review_window, local_date};
pub use value_objects::{DomainError, Participant, ReviewDecision};
