//! `.dev.toml` parsing

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::DevError;

/// File name looked up at the workspace root
pub const FILE_NAME: &str = ".dev.toml";

/// Contents of `.dev.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DevToml {
    /// Build tool binary name or path
    pub bazel: Option<String>,

    /// Remote cache endpoint (`host:port`)
    pub remote_cache: Option<String>,
}

impl DevToml {
    /// Load `.dev.toml` from `dir`, or defaults if it does not exist
    pub fn load_in(dir: &Path) -> Result<Self> {
        let path = dir.join(FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let parsed = toml::from_str(&content).map_err(|source| DevError::Config {
            path: path.clone(),
            source,
        })?;
        Ok(parsed)
    }
}
