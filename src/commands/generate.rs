//! Generate command implementation

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use crate::bazel::Bazel;
use crate::config::DevConfig;
use crate::error::DevError;
use crate::exec::CommandRunner;

/// Arguments for `gazelle update-repos`, syncing DEPS.bzl with go.mod
const GAZELLE_UPDATE_REPOS: &[&str] = &[
    "update-repos",
    "-from_file=go.mod",
    "-build_file_proto_mode=disable_global",
    "-to_macro=DEPS.bzl%go_deps",
    "-prune=true",
];

/// Generate the specified files
#[derive(Args, Debug)]
#[command(after_help = "Examples:
  dev generate
  dev generate bazel")]
pub struct GenerateCommand {
    /// What to generate (bazel); everything when omitted
    pub targets: Vec<String>,
}

/// A code generator reachable from `dev generate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    /// BUILD files, Go dependency macros and the test suite listing
    Bazel,
}

impl Generator {
    /// Generators run when no target is named
    pub const ALL: &'static [Generator] = &[Generator::Bazel];

    pub fn from_name(name: &str) -> Result<Self, DevError> {
        match name {
            "bazel" => Ok(Generator::Bazel),
            _ => Err(DevError::UnrecognizedTarget(name.to_string())),
        }
    }

    /// Run the generator from `cwd`
    pub fn run(self, bazel: &Bazel<'_>, cwd: &Path) -> Result<()> {
        match self {
            Generator::Bazel => generate_bazel(bazel, cwd),
        }
    }
}

impl GenerateCommand {
    /// Execute the generate command from the directory `dev` was started in
    pub fn execute(self, config: &DevConfig, runner: &dyn CommandRunner) -> Result<()> {
        run_generators(&self.targets, &Bazel::new(runner, config), &config.working_dir)
    }
}

/// Run the named generators in order, or all of them
///
/// Names are resolved one at a time, so generators before an unknown name
/// still run.
pub fn run_generators(targets: &[String], bazel: &Bazel<'_>, cwd: &Path) -> Result<()> {
    if targets.is_empty() {
        for generator in Generator::ALL {
            generator.run(bazel, cwd)?;
        }
        return Ok(());
    }

    for target in targets {
        Generator::from_name(target)?.run(bazel, cwd)?;
    }
    Ok(())
}

fn generate_bazel(bazel: &Bazel<'_>, cwd: &Path) -> Result<()> {
    let update_repos: Vec<String> = GAZELLE_UPDATE_REPOS.iter().map(|s| s.to_string()).collect();
    bazel.run("//:gazelle", &[], &update_repos)?;

    // The generator prints the file; it runs from the source tree, not the runfiles dir.
    let run_under = vec!["--run_under".to_string(), format!("cd {} &&", cwd.display())];
    let build_file = bazel.run_capture("//pkg/cmd/generate-test-suites", &run_under)?;

    let path = cwd.join("pkg").join("BUILD.bazel");
    std::fs::write(&path, build_file)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    bazel.run("//:gazelle", &[], &[])?;
    Ok(())
}
