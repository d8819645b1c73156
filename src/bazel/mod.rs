//! Typed invocations of the `bazel` binary
//!
//! ## Architecture
//!
//! ```text
//! commands/* → Bazel → CommandRunner → bazel (child process)
//! ```

pub mod aquery;
pub mod labels;

use std::path::PathBuf;

use crate::config::DevConfig;
use crate::error::DevError;
use crate::exec::{CommandResult, CommandRunner, Invocation, OutputMode};

use aquery::ActionQueryResult;

/// Handle for running Bazel with the shared flags from [`DevConfig`]
pub struct Bazel<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a DevConfig,
}

impl<'a> Bazel<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a DevConfig) -> Self {
        Self { runner, config }
    }

    /// Flags pointing Bazel at the configured remote cache
    ///
    /// The endpoint is a `bazel-remote` instance; it also serves the Remote
    /// Asset API, so it doubles as the downloader.
    pub fn remote_cache_flags(&self) -> Vec<String> {
        match &self.config.remote_cache {
            Some(addr) => vec![
                "--remote_local_fallback".to_string(),
                format!("--remote_cache=grpc://{}", addr),
                format!("--experimental_remote_downloader=grpc://{}", addr),
            ],
            None => Vec::new(),
        }
    }

    fn invoke(&self, args: Vec<String>, mode: OutputMode) -> Result<CommandResult, DevError> {
        let invocation = Invocation::new(self.config.bazel.as_str(), args);
        self.runner.run(&invocation, mode)
    }

    /// Args for a build-like verb: the verb, cache flags, then the rest
    fn verb_args(&self, verb: &str, rest: impl IntoIterator<Item = String>) -> Vec<String> {
        let mut args = vec![verb.to_string()];
        args.extend(self.remote_cache_flags());
        args.extend(rest);
        args
    }

    /// `bazel build <targets>`
    pub fn build(&self, targets: &[String]) -> Result<(), DevError> {
        let args = self.verb_args("build", targets.iter().cloned());
        self.invoke(args, OutputMode::Stream).map(drop)
    }

    /// `bazel test <flags> <targets>`
    pub fn test(&self, targets: &[String], flags: &[String]) -> Result<(), DevError> {
        let rest = flags.iter().chain(targets).cloned();
        let args = self.verb_args("test", rest);
        self.invoke(args, OutputMode::Stream).map(drop)
    }

    fn run_args(&self, target: &str, flags: &[String], program_args: &[String]) -> Vec<String> {
        let mut rest = vec![target.to_string()];
        rest.extend(flags.iter().cloned());
        if !program_args.is_empty() {
            rest.push("--".to_string());
            rest.extend(program_args.iter().cloned());
        }
        self.verb_args("run", rest)
    }

    /// `bazel run <target> <flags> [-- <program args>]`, streaming output
    pub fn run(&self, target: &str, flags: &[String], program_args: &[String]) -> Result<(), DevError> {
        let args = self.run_args(target, flags, program_args);
        self.invoke(args, OutputMode::Stream).map(drop)
    }

    /// Like [`Bazel::run`], but returns the program's stdout
    pub fn run_capture(&self, target: &str, flags: &[String]) -> Result<Vec<u8>, DevError> {
        let args = self.run_args(target, flags, &[]);
        Ok(self.invoke(args, OutputMode::Capture)?.stdout)
    }

    /// `bazel info <key>`, whitespace-trimmed
    pub fn info(&self, key: &str) -> Result<String, DevError> {
        let invocation = Invocation::new(self.config.bazel.as_str(), ["info", key]);
        let result = self.runner.run(&invocation, OutputMode::Capture)?;
        result
            .stdout_trimmed()
            .map(str::to_string)
            .map_err(|e| DevError::invalid_output(&invocation, e))
    }

    /// Raw `bazel aquery <target> --output=jsonproto`
    pub fn aquery(&self, target: &str) -> Result<Vec<u8>, DevError> {
        let args = vec![
            "aquery".to_string(),
            target.to_string(),
            "--output=jsonproto".to_string(),
        ];
        Ok(self.invoke(args, OutputMode::Capture)?.stdout)
    }

    /// Absolute path of the binary linked for `target`
    ///
    /// Resolved without going through the `bazel-out` convenience symlink.
    pub fn locate_artifact(&self, target: &str) -> Result<PathBuf, DevError> {
        let query = ActionQueryResult::parse(&self.aquery(target)?)?;
        aquery::resolve_binary(&query, target, || self.info("output_path"))
    }
}
