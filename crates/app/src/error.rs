use std::path::PathBuf;

use concilia_import::{LedgerError, ReconcileError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid run configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Ledger configuration error: {0}")]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),
    #[error("Export I/O error: {0}")]
    ExportIo(#[from] std::io::Error),
}
