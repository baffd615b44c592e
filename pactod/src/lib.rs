//! Pacto Daemon Library
//!
//! Runtime orchestrator for the Pacto points ledger.
//!
//! # Architecture
//!
//! ```text
//! Browser → API Server → Ledger Service → Engine
//!                             ↕
//!                        Ledger Store (JSON file)
//! ```
//!
//! # Components
//!
//! - **Daemon**: Main runtime orchestrator
//! - **Ledger Service**: load → engine → save around each request
//! - **API**: HTTP endpoints for the front-end
//! - **Clock**: Source of "now" (wall clock or fixed for tests)
//! - **Config**: Environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use pactod::{Config, Daemon};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("Failed to load config");
//!     let daemon = Daemon::new_file(config);
//!     daemon.run().await.expect("Daemon error");
//! }
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod clock;
pub mod config;
pub mod daemon;
pub mod error;
pub mod ledger_service;

// Re-exports for convenience
pub use api::{create_router, ApiState};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ApiConfig, Config, Environment, StorageConfig};
pub use daemon::Daemon;
pub use error::{DaemonError, DaemonResult};
pub use ledger_service::LedgerService;
