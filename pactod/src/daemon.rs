//! Daemon: Main runtime orchestrator.
//!
//! The Daemon ties together all components:
//! - Ledger Service (load → engine → save per request)
//! - Ledger Store (JSON file or in-memory)
//! - API Server (HTTP endpoints + static front-end)
//!
//! # Lifecycle
//!
//! 1. Load configuration
//! 2. Initialize components
//! 3. Load the ledger (bootstraps an empty document on first run)
//! 4. Start API server
//! 5. Wait for SIGINT
//! 6. Graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::{error, info};

use pacto_engine::LedgerEngine;
use pacto_store::{JsonFileStore, LedgerStore, MemoryStore};

use crate::api::{create_router, ApiState};
use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::{DaemonError, DaemonResult};
use crate::ledger_service::LedgerService;

// =============================================================================
// Daemon
// =============================================================================

/// The main Pacto daemon.
pub struct Daemon<S: LedgerStore + 'static> {
    /// Configuration
    config: Config,
    /// Ledger service
    ledger: Arc<RwLock<LedgerService<S>>>,
}

impl Daemon<MemoryStore> {
    /// Create a new daemon backed by an in-memory ledger (for testing).
    pub fn new_memory(config: Config) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }
}

impl Daemon<JsonFileStore> {
    /// Create a new daemon backed by the configured JSON file.
    pub fn new_file(config: Config) -> Self {
        let store = Arc::new(JsonFileStore::new(config.storage.data_file.clone()));
        Self::with_store(config, store)
    }
}

impl<S: LedgerStore + 'static> Daemon<S> {
    /// Create a new daemon over the given store, using the wall clock.
    pub fn with_store(config: Config, store: Arc<S>) -> Self {
        let engine = LedgerEngine::new(config.rules);
        let service = LedgerService::new(engine, store, Arc::new(SystemClock));
        Self::new(config, Arc::new(RwLock::new(service)))
    }

    /// Create a new daemon with provided components.
    pub fn new(config: Config, ledger: Arc<RwLock<LedgerService<S>>>) -> Self {
        Self { config, ledger }
    }

    /// Run the daemon.
    ///
    /// This method blocks until shutdown is requested (SIGINT).
    pub async fn run(self) -> DaemonResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.config.environment,
            "Starting Pacto daemon"
        );

        // 1. Load (or create) the ledger
        self.restore_ledger().await?;

        // 2. Start API server
        let api_addr = self.start_api_server().await?;
        info!(%api_addr, "API server started");

        // 3. Wait for shutdown
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        } else {
            info!("Received shutdown signal");
        }

        // 4. Graceful shutdown
        self.shutdown().await
    }

    /// Load the ledger once at startup.
    async fn restore_ledger(&self) -> DaemonResult<()> {
        let service = self.ledger.read().await;
        let count = service.bootstrap().await?;

        if count > 0 {
            info!(records = count, "Ledger loaded");
        } else {
            info!("Ledger is empty");
        }

        Ok(())
    }

    /// Start the API server.
    async fn start_api_server(&self) -> DaemonResult<SocketAddr> {
        let state = Arc::new(ApiState {
            ledger: self.ledger.clone(),
        });

        let router = create_router(state, self.config.api.static_dir.as_deref());
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);

        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            DaemonError::Config(format!("Failed to bind to {}: {}", addr, e))
        })?;

        let local_addr = listener.local_addr().map_err(|e| {
            DaemonError::Config(format!("Failed to get local address: {}", e))
        })?;

        // Spawn the server task
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!(error = %e, "API server error");
            }
        });

        Ok(local_addr)
    }

    /// Graceful shutdown.
    ///
    /// Every command already saved its result, so there is nothing to flush
    /// and the store is not touched.
    async fn shutdown(&self) -> DaemonResult<()> {
        info!("Initiating graceful shutdown");

        // Wait for any in-flight command to release the service
        let _service = self.ledger.write().await;

        info!("Shutdown complete");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
