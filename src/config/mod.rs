//! Configuration shared by every subcommand
//!
//! Global flags and the optional `.dev.toml` are folded into one
//! [`DevConfig`] value that is handed to each command's `execute`.

pub mod dev_toml;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use dev_toml::DevToml;

/// Default build tool binary
pub const DEFAULT_BAZEL: &str = "bazel";

/// Files marking the root of a Bazel workspace
const WORKSPACE_MARKERS: &[&str] = &["WORKSPACE", "WORKSPACE.bazel", "MODULE.bazel"];

/// Values passed on the command line that take precedence over `.dev.toml`
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub remote_cache: Option<String>,
}

/// Resolved configuration for one invocation of `dev`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevConfig {
    /// Build tool binary name or path
    pub bazel: String,

    /// gRPC endpoint of a remote cache (`host:port`)
    pub remote_cache: Option<String>,

    /// Root of the Bazel workspace (falls back to the working directory)
    pub workspace_root: PathBuf,

    /// Directory `dev` was started from
    pub working_dir: PathBuf,
}

impl DevConfig {
    /// Resolve configuration for a process started in `cwd`
    pub fn resolve(overrides: &Overrides, cwd: &Path) -> Result<Self> {
        let workspace_root = find_workspace_root(cwd).unwrap_or_else(|| cwd.to_path_buf());
        let file = DevToml::load_in(&workspace_root)?;

        Ok(Self {
            bazel: file.bazel.unwrap_or_else(|| DEFAULT_BAZEL.to_string()),
            remote_cache: overrides
                .remote_cache
                .clone()
                .or(file.remote_cache)
                .filter(|addr| !addr.is_empty()),
            workspace_root,
            working_dir: cwd.to_path_buf(),
        })
    }
}

/// Find the workspace root by walking up from `start`
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| WORKSPACE_MARKERS.iter().any(|m| dir.join(m).is_file()))
        .map(Path::to_path_buf)
}
