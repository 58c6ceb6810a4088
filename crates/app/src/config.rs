use std::path::Path;

use concilia_import::LedgerProfile;
use concilia_statement::ExtractionOptions;
use serde::{Deserialize, Serialize};

use crate::error::RunError;

/// Settings for one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub ledger: LedgerProfile,
    pub extraction: ExtractionOptions,
}

impl RunConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, RunError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, RunError> {
        let content = std::fs::read_to_string(path).map_err(|source| RunError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}
