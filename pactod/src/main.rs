//! Pacto Daemon
//!
//! Serves the points-and-favors ledger over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Start with default configuration
//! cargo run -p pactod
//!
//! # Start with custom environment
//! PACTO_ENV=test PACTO_API_PORT=8081 cargo run -p pactod
//! ```
//!
//! # Environment Variables
//!
//! - `PACTO_ENV`: Environment (test, development, production)
//! - `PACTO_API_HOST`: API host (default: 0.0.0.0)
//! - `PACTO_API_PORT`: API port (default: 3000)
//! - `PACTO_DATA_FILE`: Ledger document (default: /tmp/pacto-data.json)
//! - `PACTO_STATIC_DIR`: Front-end assets (default: public, empty disables)
//! - `PACTO_DAILY_REDEMPTION_LIMIT`: Redemptions per day (default: 3)
//! - `PACTO_HISTORY_LIMIT`: Resolved favors in status history (default: 50)

use pactod::{Config, Daemon, Environment};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("pactod=info".parse()?))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        api_host = %config.api.host,
        api_port = config.api.port,
        data_file = %config.storage.data_file.display(),
        "Pacto Daemon"
    );

    // Create and run daemon
    match config.environment {
        Environment::Test => Daemon::new_memory(config).run().await?,
        Environment::Development | Environment::Production => {
            Daemon::new_file(config).run().await?
        }
    }

    Ok(())
}
