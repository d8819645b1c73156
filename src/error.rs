//! Error types and helpers for user-friendly error messages
//!
//! Every failure is returned to the immediate caller untouched; formatting
//! for the terminal happens once, in `main`.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::exec::subprocess::Invocation;

/// Errors raised while driving the build tool
#[derive(Error, Debug)]
pub enum DevError {
    /// The external tool could not be launched, or exited unsuccessfully
    #[error("failed to execute `{command}`")]
    Execution {
        command: String,
        #[source]
        source: ExecutionFailure,
    },

    /// Structured build-tool output did not have the expected shape
    #[error("failed to parse action query output")]
    Parse(#[from] serde_json::Error),

    /// The tool printed something that is not valid UTF-8 where text was expected
    #[error("output of `{command}` is not valid UTF-8")]
    InvalidOutput {
        command: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The query succeeded but produced no linked binary for the target
    #[error("could not find path to binary {target:?}")]
    NotFound { target: String },

    /// Tool/executable not found on PATH
    #[error("{tool} not found in $PATH")]
    MissingTool { tool: String, hint: String },

    /// `.dev.toml` could not be parsed
    #[error("invalid configuration in {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A subcommand was handed a target it does not know about
    #[error("unrecognized target: {0}")]
    UnrecognizedTarget(String),
}

/// Underlying cause of a [`DevError::Execution`]
#[derive(Error, Debug)]
pub enum ExecutionFailure {
    #[error("could not start process")]
    Spawn(#[source] io::Error),

    #[error("lost track of process")]
    Wait(#[source] io::Error),

    #[error("exited with status {0}")]
    Status(i32),

    #[error("terminated by signal")]
    Signal,
}

impl DevError {
    /// Execution error for an invocation that failed with `failure`
    pub fn execution(invocation: &Invocation, failure: ExecutionFailure) -> Self {
        Self::Execution {
            command: invocation.to_string(),
            source: failure,
        }
    }

    /// Execution error derived from a non-successful exit status
    pub fn exit_status(invocation: &Invocation, status: ExitStatus) -> Self {
        let failure = match status.code() {
            Some(code) => ExecutionFailure::Status(code),
            None => ExecutionFailure::Signal,
        };
        Self::execution(invocation, failure)
    }

    /// Error for an invocation whose output could not be decoded
    pub fn invalid_output(invocation: &Invocation, source: std::str::Utf8Error) -> Self {
        Self::InvalidOutput {
            command: invocation.to_string(),
            source,
        }
    }

    /// Missing tool error with the matching installation hint
    pub fn missing_tool(tool: impl Into<String>) -> Self {
        let tool = tool.into();
        let hint = hints::for_tool(&tool).to_string();
        Self::MissingTool { tool, hint }
    }

    /// Actionable hint to print below the error, if any
    pub fn hint(&self) -> Option<&str> {
        match self {
            DevError::MissingTool { hint, .. } => Some(hint.as_str()),
            DevError::Config { .. } => Some(hints::dev_toml()),
            DevError::NotFound { .. } => Some(hints::not_a_binary()),
            _ => None,
        }
    }
}

/// Common error hints
pub mod hints {
    /// Hint for a missing executable
    pub fn for_tool(tool: &str) -> &'static str {
        match tool {
            "bazel" | "bazelisk" => bazel(),
            _ => "Make sure the tool is installed and its directory is on your PATH.",
        }
    }

    /// Get hint for missing Bazel
    pub fn bazel() -> &'static str {
        "Install Bazelisk, which fetches the Bazel version pinned by the workspace:\n\
         • macOS: brew install bazelisk\n\
         • Linux: download from https://github.com/bazelbuild/bazelisk/releases\n\
         \n\
         Or point `bazel` in .dev.toml at an existing installation."
    }

    /// Get hint for an invalid .dev.toml
    pub fn dev_toml() -> &'static str {
        ".dev.toml accepts only these keys:\n\
         • bazel = \"<binary name or path>\"\n\
         • remote_cache = \"<host:port>\""
    }

    /// Get hint for a target without a link action
    pub fn not_a_binary() -> &'static str {
        "Only targets producing a linked Go binary (go_binary) can be located."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_quotes_target() {
        let err = DevError::NotFound {
            target: "//pkg/cmd/cockroach".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not find path to binary \"//pkg/cmd/cockroach\""
        );
    }

    #[test]
    fn test_execution_error_chain() {
        let invocation = Invocation::new("bazel", ["info", "output_path"]);
        let err = DevError::execution(&invocation, ExecutionFailure::Status(2));
        let rendered = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(
            rendered,
            "failed to execute `bazel info output_path`: exited with status 2"
        );
    }

    #[test]
    fn test_missing_tool_hint() {
        let err = DevError::missing_tool("bazel");
        assert_eq!(err.to_string(), "bazel not found in $PATH");
        assert!(err.hint().unwrap().contains("bazelisk"));
    }

    #[test]
    fn test_unrecognized_target_has_no_hint() {
        let err = DevError::UnrecognizedTarget("protobuf".to_string());
        assert_eq!(err.to_string(), "unrecognized target: protobuf");
        assert!(err.hint().is_none());
    }
}
