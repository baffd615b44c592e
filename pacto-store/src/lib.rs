//! Pacto Storage Layer
//!
//! Provides persistence for the ledger document.
//!
//! # Architecture
//!
//! - **Repository trait**: `LedgerStore`, the storage interface (port)
//! - **In-memory store**: Fast implementation for testing
//! - **JSON file store**: Durable single-document implementation
//!
//! # Usage
//!
//! ```rust
//! use pacto_store::{LedgerStore, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::new();
//!
//!     // First load bootstraps an empty ledger
//!     let mut ledger = store.load().await.unwrap();
//!     let id = ledger.next_id();
//!     store.save(&ledger).await.unwrap();
//!
//!     println!("Last id: {}", id);
//! }
//! ```

#![warn(clippy::all)]

// Modules
mod error;
mod file;
mod memory;
mod repository;

// Re-exports
pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use repository::LedgerStore;
