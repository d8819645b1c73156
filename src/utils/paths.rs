//! Path utilities for dev

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Directory under the workspace root where built binaries are linked
pub fn get_bin_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join("bin")
}

/// Ensure a directory exists
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Point `link` at `target`, replacing whatever `link` was before
pub fn replace_symlink(target: &Path, link: &Path) -> Result<()> {
    if link.symlink_metadata().is_ok() {
        std::fs::remove_file(link)
            .with_context(|| format!("Failed to remove {}", link.display()))?;
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link)
        .with_context(|| format!("Failed to symlink {} to {}", link.display(), target.display()))?;

    #[cfg(windows)]
    std::os::windows::fs::symlink_file(target, link)
        .with_context(|| format!("Failed to symlink {} to {}", link.display(), target.display()))?;

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_replace_symlink_overwrites_existing_link() {
        let dir = TempDir::new().unwrap();
        let bin = get_bin_dir(dir.path());
        ensure_dir(&bin).unwrap();
        let link = bin.join("cockroach");

        replace_symlink(Path::new("/old/cockroach"), &link).unwrap();
        replace_symlink(Path::new("/new/cockroach"), &link).unwrap();

        assert_eq!(std::fs::read_link(&link).unwrap(), PathBuf::from("/new/cockroach"));
    }

    #[test]
    fn test_replace_symlink_overwrites_regular_file() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("optgen");
        std::fs::write(&link, "stale").unwrap();

        replace_symlink(Path::new("/out/optgen"), &link).unwrap();
        assert_eq!(std::fs::read_link(&link).unwrap(), PathBuf::from("/out/optgen"));
    }
}
