//! Action graph queries and binary location
//!
//! `bazel aquery <target> --output=jsonproto` reports every action needed to
//! build a target. The linked binary is the first output of the first link
//! action; its exec path is relative to the `bazel-out` convenience symlink,
//! which we avoid by re-rooting it under `bazel info output_path`.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

use crate::error::DevError;

/// Mnemonic of the action producing a linked Go binary
pub const LINK_MNEMONIC: &str = "GoLink";

/// Exec-path prefix that aliases the output root
pub const OUTPUT_ROOT_ALIAS: &str = "bazel-out/";

/// Parsed `aquery --output=jsonproto` document
///
/// Only the fields needed for locating binaries are kept.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ActionQueryResult {
    #[serde(default)]
    pub artifacts: Vec<Artifact>,

    #[serde(default)]
    pub actions: Vec<Action>,
}

/// A build output tracked by Bazel
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(deserialize_with = "ids::one")]
    pub id: String,
    pub exec_path: String,
}

/// One action in the graph
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(default)]
    pub mnemonic: String,

    #[serde(default, deserialize_with = "ids::many")]
    pub output_ids: Vec<String>,
}

impl ActionQueryResult {
    /// Parse raw aquery output
    pub fn parse(bytes: &[u8]) -> Result<Self, DevError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// First action with the given mnemonic, in document order
    pub fn first_action(&self, mnemonic: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.mnemonic == mnemonic)
    }

    /// Artifact with the given id
    pub fn artifact(&self, id: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.id == id)
    }

    /// Primary output of the first link action
    pub fn link_output(&self) -> Option<&Artifact> {
        let action = self.first_action(LINK_MNEMONIC)?;
        let id = action.output_ids.first()?;
        self.artifact(id)
    }
}

/// Strip the output-root alias from an exec path, if present
pub fn strip_output_root(exec_path: &str) -> &str {
    exec_path
        .strip_prefix(OUTPUT_ROOT_ALIAS)
        .unwrap_or(exec_path)
}

/// Join the output root and an exec path relative to it
pub fn join_output_path(output_root: &str, relative: &str) -> PathBuf {
    PathBuf::from(format!("{}/{}", output_root, relative))
}

/// Resolve the absolute path of the binary described by `query`
///
/// `output_root` is only consulted once a link output has been found.
pub fn resolve_binary<F>(
    query: &ActionQueryResult,
    target: &str,
    output_root: F,
) -> Result<PathBuf, DevError>
where
    F: FnOnce() -> Result<String, DevError>,
{
    let artifact = query.link_output().ok_or_else(|| DevError::NotFound {
        target: target.to_string(),
    })?;
    let relative = strip_output_root(&artifact.exec_path);
    Ok(join_output_path(&output_root()?, relative))
}

/// Older Bazel releases emit ids as strings, newer ones as integers.
mod ids {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    impl From<RawId> for String {
        fn from(id: RawId) -> Self {
            match id {
                RawId::Text(s) => s,
                RawId::Number(n) => n.to_string(),
            }
        }
    }

    pub fn one<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        RawId::deserialize(d).map(String::from)
    }

    pub fn many<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        let raw = Vec::<RawId>::deserialize(d)?;
        Ok(raw.into_iter().map(String::from).collect())
    }
}
