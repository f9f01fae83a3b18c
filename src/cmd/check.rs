//! Blueprint validation command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::blueprint::Blueprint;

/// Parse and validate blueprint files; directories are scanned for `*.toml`.
pub fn run(paths: &[PathBuf]) -> Result<()> {
    let mut checked = 0usize;
    let mut failures = 0usize;

    for path in collect(paths)? {
        checked += 1;
        match Blueprint::from_file(&path).and_then(|bp| bp.validate().map(|()| bp)) {
            Ok(bp) => println!("ok: {} ({})", path.display(), bp.package.name),
            Err(e) => {
                failures += 1;
                eprintln!("FAIL: {}: {e}", path.display());
            }
        }
    }

    if checked == 0 {
        anyhow::bail!("No blueprint files found");
    }
    if failures > 0 {
        anyhow::bail!("{failures} of {checked} blueprints failed validation");
    }
    println!("{checked} blueprints ok");
    Ok(())
}

fn collect(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
                let entry = entry.with_context(|| format!("Scanning {}", path.display()))?;
                if entry.file_type().is_file() && has_ext(entry.path(), "toml") {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn has_ext(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}
