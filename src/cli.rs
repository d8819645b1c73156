//! CLI argument parsing using clap derive macros

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::commands::{
    bench::BenchCommand, build::BuildCommand, generate::GenerateCommand, lint::LintCommand,
    test::TestCommand,
};
use crate::config::{DevConfig, Overrides};
use crate::exec::SystemRunner;
use crate::utils::tools::require_tool;

const LONG_ABOUT: &str = "\
Dev is the general-purpose dev tool for folks working on the repository. It
lets engineers do a few things:

- build various binaries (cockroach, optgen, ...)
- run arbitrary tests (unit tests, logic tests, ...)
- run tests under arbitrary configurations (under stress, using race builds, ...)
- generate code (bazel files, protobufs, ...)

Every subcommand shells out to Bazel, which must be on $PATH.";

/// Dev is the general-purpose dev tool for working on the repository.
///
/// Usage is only printed for malformed invocations; build and test failures
/// are reported as errors.
#[derive(Parser, Debug)]
#[command(name = "dev")]
#[command(version, long_about = LONG_ABOUT)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Enable debug logging for dev itself
    #[arg(long, global = true)]
    pub debug: bool,

    /// Remote caching gRPC endpoint to use (a bazel-remote instance, host:port)
    #[arg(long, global = true, env = "DEV_REMOTE_CACHE", value_name = "ADDR")]
    pub remote_cache: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the specified benchmarks
    Bench(BenchCommand),

    /// Build the specified binaries
    Build(BuildCommand),

    /// Generate the specified files
    #[command(alias = "gen")]
    Generate(GenerateCommand),

    /// Run the specified linters
    Lint(LintCommand),

    /// Run the specified tests
    Test(TestCommand),
}

impl Cli {
    /// Flags folded into the configuration
    pub fn overrides(&self) -> Overrides {
        Overrides {
            remote_cache: self.remote_cache.clone(),
        }
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let config = DevConfig::resolve(&self.overrides(), &cwd)?;
        tracing::debug!(?config, "resolved configuration");

        require_tool(&config.bazel)?;

        let runner = SystemRunner;
        match self.command {
            Commands::Bench(cmd) => cmd.execute(&config, &runner),
            Commands::Build(cmd) => cmd.execute(&config, &runner),
            Commands::Generate(cmd) => cmd.execute(&config, &runner),
            Commands::Lint(cmd) => cmd.execute(&config, &runner),
            Commands::Test(cmd) => cmd.execute(&config, &runner),
        }
    }
}
