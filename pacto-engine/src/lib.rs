//! Pacto Engine Layer
//!
//! Pure decision logic, deterministic, no I/O.
//! Takes the ledger and the current instant → returns the outcome.

#![warn(clippy::all)]

pub mod engine;
pub mod error;
pub mod status;

pub use engine::{LedgerEngine, LedgerRules, DEFAULT_DAILY_REDEMPTION_LIMIT, DEFAULT_HISTORY_LIMIT};
pub use error::{EngineError, EngineResult};
pub use status::{CatalogView, StatusReport};
