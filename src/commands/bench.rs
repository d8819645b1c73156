//! Benchmark command implementation

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::bazel::{labels, Bazel};
use crate::config::DevConfig;
use crate::exec::CommandRunner;
use crate::utils::duration::parse_duration;

/// Run the specified benchmarks
#[derive(Args, Debug)]
#[command(after_help = "Examples:
  dev bench pkg/sql/parser --filter=BenchmarkParse
  dev bench pkg/util/... --short")]
pub struct BenchCommand {
    /// Packages to benchmark; all of them when omitted
    pub packages: Vec<String>,

    /// Run only benchmarks matching this regexp
    #[arg(short, long, default_value = ".")]
    pub filter: String,

    /// Give up after this long (e.g. 10m; units h, m, s, ms)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Pass -test.short to the test binaries
    #[arg(long)]
    pub short: bool,
}

impl BenchCommand {
    /// Bazel flags for this invocation; unit tests are skipped with `-test.run=-`
    pub fn bazel_flags(&self) -> Vec<String> {
        let mut flags = vec![
            "--test_arg=-test.run=-".to_string(),
            format!("--test_arg=-test.bench={}", self.filter),
        ];
        if self.short {
            flags.push("--test_arg=-test.short".to_string());
        }
        if let Some(timeout) = self.timeout {
            flags.push(format!("--test_timeout={}", timeout.as_secs().max(1)));
        }
        flags.push("--test_output=streamed".to_string());
        flags
    }

    /// Execute the bench command
    pub fn execute(self, config: &DevConfig, runner: &dyn CommandRunner) -> Result<()> {
        let targets = labels::test_targets(&self.packages);
        Bazel::new(runner, config).test(&targets, &self.bazel_flags())?;
        Ok(())
    }
}
