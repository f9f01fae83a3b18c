//! Symbol reconciliation command.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::platform::Platform;
use crate::store::installed::{InstalledQuery, ManifestDir, NoInstalledPackages};
use crate::symbols::sorter::Symsorter;
use crate::symbols::{ReconcileRequest, reconcile};

pub fn run(
    archive_dir: PathBuf,
    install_root: PathBuf,
    dest: Option<PathBuf>,
    platform: Platform,
    manifest_dir: Option<PathBuf>,
) -> Result<()> {
    let dest = dest.unwrap_or_else(crate::symbols_dir);
    let request = ReconcileRequest::new(archive_dir, install_root, dest, platform);
    let sorter = Symsorter::find()?;

    // Fall back to the craft root's manifest directory when it exists.
    let manifest_dir = manifest_dir.or_else(|| {
        let default = crate::manifest_dir();
        default.is_dir().then_some(default)
    });
    let report = match manifest_dir {
        Some(dir) => run_with(&request, &sorter, &ManifestDir::new(dir))?,
        None => run_with(&request, &sorter, &NoInstalledPackages)?,
    };

    println!(
        "sorted {} binaries, skipped {}",
        report.sorted.len(),
        report.skipped.len()
    );
    for skipped in &report.skipped {
        println!("  skipped {}", skipped.display());
    }
    Ok(())
}

fn run_with(
    request: &ReconcileRequest,
    sorter: &Symsorter,
    installed: &dyn InstalledQuery,
) -> Result<crate::symbols::ReconcileReport> {
    Ok(reconcile(request, sorter, installed)?)
}
