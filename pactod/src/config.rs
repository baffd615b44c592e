//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{DaemonError, DaemonResult};
use pacto_engine::{LedgerRules, DEFAULT_DAILY_REDEMPTION_LIMIT, DEFAULT_HISTORY_LIMIT};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Ledger storage configuration
    pub storage: StorageConfig,

    /// Ledger rule limits
    pub rules: LedgerRules,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Directory of static front-end assets, if any
    pub static_dir: Option<PathBuf>,
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path of the ledger JSON document
    pub data_file: PathBuf,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment (in-memory ledger)
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_FILE: &str = "/tmp/pacto-data.json";
const DEFAULT_STATIC_DIR: &str = "public";

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> DaemonResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let environment = Self::load_environment()?;
        let api = Self::load_api_config()?;
        let storage = Self::load_storage_config();
        let rules = Self::load_rules()?;

        Ok(Self {
            api,
            storage,
            rules,
            environment,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                static_dir: None,
            },
            storage: StorageConfig {
                data_file: env::temp_dir().join("pacto-test-data.json"),
            },
            rules: LedgerRules::default(),
            environment: Environment::Test,
        }
    }

    fn load_environment() -> DaemonResult<Environment> {
        let env_str = env::var("PACTO_ENV").unwrap_or_else(|_| "development".to_string());
        env_str.parse()
    }

    fn load_api_config() -> DaemonResult<ApiConfig> {
        let host = env::var("PACTO_API_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = Self::load_parsed_env("PACTO_API_PORT", DEFAULT_PORT)?;

        // Empty value disables static serving
        let static_dir = match env::var("PACTO_STATIC_DIR") {
            Ok(dir) if dir.trim().is_empty() => None,
            Ok(dir) => Some(PathBuf::from(dir)),
            Err(_) => Some(PathBuf::from(DEFAULT_STATIC_DIR)),
        };

        Ok(ApiConfig {
            host,
            port,
            static_dir,
        })
    }

    fn load_storage_config() -> StorageConfig {
        let data_file = env::var("PACTO_DATA_FILE").unwrap_or_else(|_| DEFAULT_DATA_FILE.to_string());
        StorageConfig {
            data_file: PathBuf::from(data_file),
        }
    }

    fn load_rules() -> DaemonResult<LedgerRules> {
        let daily_redemption_limit =
            Self::load_parsed_env("PACTO_DAILY_REDEMPTION_LIMIT", DEFAULT_DAILY_REDEMPTION_LIMIT)?;
        let history_limit = Self::load_parsed_env("PACTO_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?;

        Ok(LedgerRules {
            daily_redemption_limit,
            history_limit,
        })
    }

    fn load_parsed_env<T: FromStr>(key: &str, default: T) -> DaemonResult<T> {
        match env::var(key) {
            Ok(val) => val
                .trim()
                .parse::<T>()
                .map_err(|_| DaemonError::Config(format!("Invalid {} value: {}", key, val))),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                static_dir: Some(PathBuf::from(DEFAULT_STATIC_DIR)),
            },
            storage: StorageConfig {
                data_file: PathBuf::from(DEFAULT_DATA_FILE),
            },
            rules: LedgerRules::default(),
            environment: Environment::Development,
        }
    }
}

impl FromStr for Environment {
    type Err = DaemonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DaemonError::Config(format!(
                "Invalid PACTO_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
