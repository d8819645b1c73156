//! Tool detection

use std::path::PathBuf;

use tracing::debug;
use which::which;

use crate::error::DevError;

/// Require a tool to exist on PATH, returning its location
pub fn require_tool(tool_name: &str) -> Result<PathBuf, DevError> {
    match which(tool_name) {
        Ok(path) => {
            debug!(path = %path.display(), "found {}", tool_name);
            Ok(path)
        }
        Err(_) => Err(DevError::missing_tool(tool_name)),
    }
}
