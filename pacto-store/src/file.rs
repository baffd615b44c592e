//! JSON file store
//!
//! The ledger lives in one pretty-printed JSON document. Saves go to a
//! sibling temporary file first and are renamed over the target, so a
//! reader never observes a half-written document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pacto_domain::Ledger;
use tokio::fs;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::repository::LedgerStore;

/// Ledger stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[async_trait]
impl LedgerStore for JsonFileStore {
    async fn load(&self) -> Result<Ledger, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => {
                let ledger: Ledger = serde_json::from_slice(&bytes)?;
                debug!(
                    path = %self.path.display(),
                    records = ledger.record_count(),
                    "Ledger loaded"
                );
                Ok(ledger)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let ledger = Ledger::new();
                self.save(&ledger).await?;
                info!(path = %self.path.display(), "Created empty ledger");
                Ok(ledger)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(ledger)?;
        let tmp = self.temp_path();
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
