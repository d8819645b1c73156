//! Lint command implementation

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::bazel::Bazel;
use crate::commands::test::go_test_flags;
use crate::config::DevConfig;
use crate::exec::CommandRunner;
use crate::utils::duration::parse_duration;

/// Test target bundling the repository's linters
pub const LINT_TARGET: &str = "//pkg/testutils/lint:lint_test";

/// Run the specified linters
#[derive(Args, Debug)]
#[command(after_help = "Example:
  dev lint --filter=TestLowercaseFunctionNames --short --timeout=1m")]
pub struct LintCommand {
    /// Run only linters matching this regexp
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Skip the slower linters
    #[arg(long)]
    pub short: bool,

    /// Give up after this long (e.g. 1m; units h, m, s, ms)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

impl LintCommand {
    /// Execute the lint command
    pub fn execute(self, config: &DevConfig, runner: &dyn CommandRunner) -> Result<()> {
        let mut flags = go_test_flags(self.filter.as_deref(), self.timeout, self.short);
        flags.push("--test_output=streamed".to_string());

        Bazel::new(runner, config).test(&[LINT_TARGET.to_string()], &flags)?;
        Ok(())
    }
}
