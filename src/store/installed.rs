//! Installed-package file queries.
//!
//! The real installed-package database belongs to the orchestrator; the
//! blueprint tooling only ever asks one question of it: which files did a
//! given package install. That seam is a trait so tests can answer from
//! memory and production can answer from the manifest directory the
//! orchestrator writes (`<group>/<name>.files`, one installed path per line).

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Query seam into the installed-package database.
pub trait InstalledQuery {
    /// Files installed by `package` (e.g. `libs/runtime`), or None if the
    /// package is not installed.
    fn files_of(&self, package: &str) -> Option<Vec<PathBuf>>;
}

/// Manifest-directory backed query: `<root>/<group>/<name>.files`.
#[derive(Debug, Clone)]
pub struct ManifestDir {
    root: PathBuf,
}

impl ManifestDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn manifest_path(&self, package: &str) -> PathBuf {
        self.root.join(format!("{package}.files"))
    }
}

impl InstalledQuery for ManifestDir {
    fn files_of(&self, package: &str) -> Option<Vec<PathBuf>> {
        let path = self.manifest_path(package);
        let content = fs::read_to_string(path).ok()?;
        Some(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(PathBuf::from)
                .collect(),
        )
    }
}

/// In-memory query for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    packages: BTreeMap<String, Vec<PathBuf>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, package: &str, files: &[&str]) {
        self.packages
            .insert(package.to_string(), files.iter().map(PathBuf::from).collect());
    }
}

impl InstalledQuery for MemoryDb {
    fn files_of(&self, package: &str) -> Option<Vec<PathBuf>> {
        self.packages.get(package).cloned()
    }
}

/// Query that knows nothing; every package reads as not installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInstalledPackages;

impl InstalledQuery for NoInstalledPackages {
    fn files_of(&self, _package: &str) -> Option<Vec<PathBuf>> {
        None
    }
}
