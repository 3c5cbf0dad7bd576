//! Export file placement.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use ami_audit::{export, Report};

/// Resolve `path` against `cwd` and create its parent directories.
pub fn prepare_path(path: &Path, cwd: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    if let Some(parent) = absolute.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(absolute)
}

/// Write the export for `report` and return where it landed.
pub fn write(report: &Report, path: &Path) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("resolving working directory")?;
    let target = prepare_path(path, &cwd)?;
    export::write_to_path(report, &target)?;
    Ok(target)
}
