//! Build command implementation

use anyhow::{Context, Result};
use clap::Args;

use crate::bazel::labels::{self, BinaryTarget};
use crate::bazel::Bazel;
use crate::config::DevConfig;
use crate::exec::CommandRunner;
use crate::utils::paths::{ensure_dir, get_bin_dir, replace_symlink};
use crate::utils::terminal::print_success;

/// Build the specified binaries
#[derive(Args, Debug)]
#[command(after_help = "Examples:
  dev build
  dev build cockroach-short optgen
  dev build //pkg/cmd/roachtest")]
pub struct BuildCommand {
    /// Binaries to build: cockroach, cockroach-short, execgen, optgen, or a Bazel label
    #[arg(default_value = labels::DEFAULT_BUILD_TARGET)]
    pub targets: Vec<String>,

    /// Do not link the built binaries into bin/
    #[arg(long)]
    pub no_symlink: bool,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute(self, config: &DevConfig, runner: &dyn CommandRunner) -> Result<()> {
        let targets = self
            .targets
            .iter()
            .map(|t| labels::binary_target(t))
            .collect::<Result<Vec<_>, _>>()?;
        let bazel = Bazel::new(runner, config);

        let build_labels: Vec<String> = targets.iter().map(|t| t.label.clone()).collect();
        bazel.build(&build_labels)?;

        if self.no_symlink {
            return Ok(());
        }

        let bin_dir = get_bin_dir(&config.workspace_root);
        ensure_dir(&bin_dir)?;
        for target in &targets {
            link_binary(&bazel, target, &bin_dir)?;
        }

        Ok(())
    }
}

/// Symlink the built binary for `target` into `bin_dir`
fn link_binary(bazel: &Bazel<'_>, target: &BinaryTarget, bin_dir: &std::path::Path) -> Result<()> {
    let binary = bazel.locate_artifact(&target.label)?;
    let link = bin_dir.join(&target.name);
    replace_symlink(&binary, &link)
        .with_context(|| format!("Failed to link {}", target.label))?;

    print_success(&format!(
        "bin/{} -> {}",
        target.name,
        binary.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DevError;
    use crate::exec::subprocess::testing::ScriptedRunner;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const COCKROACH_AQUERY: &str = r#"{
        "artifacts": [
            {"id": "1", "execPath": "bazel-out/k8-fastbuild/bin/pkg/cmd/cockroach/cockroach_/cockroach"}
        ],
        "actions": [{"mnemonic": "GoLink", "outputIds": ["1"]}]
    }"#;

    fn config(root: &std::path::Path) -> DevConfig {
        DevConfig {
            bazel: "bazel".to_string(),
            remote_cache: None,
            workspace_root: root.to_path_buf(),
            working_dir: root.to_path_buf(),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_build_links_binary() {
        let ws = TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .respond("")
            .respond(COCKROACH_AQUERY)
            .respond("/cache/out\n");
        let cmd = BuildCommand {
            targets: vec!["cockroach".to_string()],
            no_symlink: false,
        };

        cmd.execute(&config(ws.path()), &runner).unwrap();

        assert_eq!(
            runner.calls(),
            vec![
                "bazel build //pkg/cmd/cockroach",
                "bazel aquery //pkg/cmd/cockroach --output=jsonproto",
                "bazel info output_path",
            ]
        );
        assert_eq!(
            std::fs::read_link(ws.path().join("bin/cockroach")).unwrap(),
            PathBuf::from("/cache/out/k8-fastbuild/bin/pkg/cmd/cockroach/cockroach_/cockroach")
        );
    }

    #[test]
    fn test_build_without_symlink() {
        let ws = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let cmd = BuildCommand {
            targets: vec!["optgen".to_string(), "execgen".to_string()],
            no_symlink: true,
        };

        cmd.execute(&config(ws.path()), &runner).unwrap();

        assert_eq!(
            runner.calls(),
            vec![
                "bazel build //pkg/sql/opt/optgen/cmd/optgen \
                 //pkg/sql/colexec/execgen/cmd/execgen"
            ]
        );
        assert!(!ws.path().join("bin").exists());
    }

    #[test]
    fn test_unknown_target_runs_nothing() {
        let ws = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let cmd = BuildCommand {
            targets: vec!["cockroach".to_string(), "nope".to_string()],
            no_symlink: false,
        };

        let err = cmd.execute(&config(ws.path()), &runner).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DevError>(),
            Some(DevError::UnrecognizedTarget(t)) if t == "nope"
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_wildcard_label_runs_nothing() {
        let ws = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let cmd = BuildCommand {
            targets: vec!["//pkg/cmd/...".to_string()],
            no_symlink: false,
        };

        let err = cmd.execute(&config(ws.path()), &runner).unwrap_err();
        assert_eq!(err.to_string(), "unrecognized target: //pkg/cmd/...");
        assert!(runner.calls().is_empty());
        assert!(!ws.path().join("bin").exists());
    }

    #[test]
    fn test_target_without_link_action() {
        let ws = TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .respond("")
            .respond(r#"{"artifacts":[],"actions":[]}"#);
        let cmd = BuildCommand {
            targets: vec!["//pkg/util/log".to_string()],
            no_symlink: false,
        };

        let err = cmd.execute(&config(ws.path()), &runner).unwrap_err();
        assert_eq!(err.to_string(), "could not find path to binary \"//pkg/util/log\"");
    }
}
