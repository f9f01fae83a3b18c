//! Debug-symbol reconciliation.
//!
//! After a build is packaged, every binary in the archive directory must be
//! paired with its platform-specific symbol file and handed to the sorting
//! tool. Known-bad files (see [`skip::SkipPattern`]) may fail without
//! aborting; everything else is all-or-nothing.

pub mod locate;
pub mod skip;
pub mod sorter;

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::core::platform::Platform;
use crate::io::{clean_directory, sniff};
use crate::store::installed::InstalledQuery;
use self::skip::{SkipPattern, SkipPatternError};
use self::sorter::SymbolSorter;

#[derive(Error, Debug)]
pub enum ReconcileError {
    /// A packaged binary has no installed counterpart. Always fatal: the
    /// archive and the install tree must agree.
    #[error("Packaged binary is not installed: {}", .0.display())]
    MissingInstallArtifact(PathBuf),

    /// The expected symbol file is absent and the binary is not skippable.
    #[error("Symbol file does not exist: {} (for {})", .symbol.display(), .binary.display())]
    MissingSymbolFile { binary: PathBuf, symbol: PathBuf },

    /// The sorting tool failed and the binary is not skippable.
    #[error("Symbol tool failed for {}", .binary.display())]
    SymbolToolFailure { binary: PathBuf },

    #[error("Skip pattern error: {0}")]
    SkipPattern(#[from] SkipPatternError),

    #[error("Tool error: {0}")]
    Tool(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Inputs of one reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    /// Staging directory holding the packaged binaries.
    pub archive_dir: PathBuf,
    /// Root of the installed layout the binaries came from.
    pub install_root: PathBuf,
    /// Output directory for sorted symbols; cleared at run start.
    pub dest_dir: PathBuf,
    pub platform: Platform,
    /// Packages whose files may be missing symbols (Windows only).
    pub no_symbol_packages: Vec<String>,
}

impl ReconcileRequest {
    pub fn new(
        archive_dir: impl Into<PathBuf>,
        install_root: impl Into<PathBuf>,
        dest_dir: impl Into<PathBuf>,
        platform: Platform,
    ) -> Self {
        Self {
            archive_dir: archive_dir.into(),
            install_root: install_root.into(),
            dest_dir: dest_dir.into(),
            platform,
            no_symbol_packages: skip::WINDOWS_NO_SYMBOL_PACKAGES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Archive-relative paths whose symbols were sorted.
    pub sorted: Vec<PathBuf>,
    /// Archive-relative paths skipped under the skip pattern.
    pub skipped: Vec<PathBuf>,
}

/// Pair every binary in the archive with its symbol file and sort it.
///
/// Fatal conditions ([`ReconcileError::MissingInstallArtifact`],
/// unmatched [`ReconcileError::MissingSymbolFile`], unmatched
/// [`ReconcileError::SymbolToolFailure`]) abort the whole run.
pub fn reconcile(
    request: &ReconcileRequest,
    sorter: &dyn SymbolSorter,
    installed: &dyn InstalledQuery,
) -> Result<ReconcileReport, ReconcileError> {
    clean_directory(&request.dest_dir)?;

    let package_names: Vec<&str> =
        request.no_symbol_packages.iter().map(String::as_str).collect();
    let allow_error = SkipPattern::for_platform(request.platform, installed, &package_names)?;
    let locator = locate::locator_for(request.platform);

    let mut report = ReconcileReport::default();
    for binary in binaries_under(&request.archive_dir)? {
        let relative = binary
            .strip_prefix(&request.archive_dir)
            .unwrap_or(&binary)
            .to_path_buf();

        // A packaged binary must also be installed.
        let installed_binary = request.install_root.join(&relative);
        if !installed_binary.exists() {
            tracing::warn!("{} does not exist", installed_binary.display());
            return Err(ReconcileError::MissingInstallArtifact(installed_binary));
        }

        let symbol_file = locator.symbol_file(&installed_binary);
        if !symbol_file.exists() {
            if allow_error.matches(&relative) {
                tracing::warn!(
                    "Ignoring missing symbol file for {}",
                    relative.display()
                );
                report.skipped.push(relative);
                continue;
            }
            tracing::warn!("{} does not exist", symbol_file.display());
            return Err(ReconcileError::MissingSymbolFile {
                binary: relative,
                symbol: symbol_file,
            });
        }

        if !sorter.sort(&request.dest_dir, &installed_binary, &symbol_file)? {
            if allow_error.matches(&relative) {
                tracing::warn!("Ignoring error for {}", relative.display());
                report.skipped.push(relative);
                continue;
            }
            tracing::warn!("Symbol tool failed for {}", relative.display());
            return Err(ReconcileError::SymbolToolFailure { binary: relative });
        }
        report.sorted.push(relative);
    }

    Ok(report)
}

/// Binaries under the archive directory, sorted for deterministic logs.
fn binaries_under(archive_dir: &Path) -> Result<Vec<PathBuf>, ReconcileError> {
    let mut binaries = Vec::new();
    for entry in WalkDir::new(archive_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if sniff::is_binary(entry.path())? {
            binaries.push(entry.path().to_path_buf());
        }
    }
    Ok(binaries)
}
