//! External symbol-sorting tool invocation.
//!
//! The sorter is a trait so the reconciler can run against a fake in tests;
//! the production implementation shells out to `symsorter`.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

/// Sorts one binary/symbol pair into the destination directory.
pub trait SymbolSorter {
    /// Returns Ok(true) on success, Ok(false) if the tool reported failure.
    fn sort(&self, dest: &Path, binary: &Path, symbol: &Path) -> Result<bool>;
}

/// The real `symsorter` tool.
#[derive(Debug, Clone)]
pub struct Symsorter {
    tool: PathBuf,
}

impl Symsorter {
    /// Locate `symsorter` on PATH.
    pub fn find() -> Result<Self> {
        let tool = which::which("symsorter").context("symsorter not found on PATH")?;
        Ok(Self { tool })
    }

    pub fn at(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }
}

impl SymbolSorter for Symsorter {
    fn sort(&self, dest: &Path, binary: &Path, symbol: &Path) -> Result<bool> {
        let status = Command::new(&self.tool)
            .arg("--compress")
            .arg("--compress")
            .arg("--output")
            .arg(dest)
            .arg(binary)
            .arg(symbol)
            .status()
            .with_context(|| format!("Failed to execute {}", self.tool.display()))?;
        Ok(status.success())
    }
}
