//! Filesystem helpers shared by the blueprint tooling.

pub mod sniff;

use std::fs;
use std::io;
use std::path::Path;

/// Remove a directory's contents and recreate it empty.
pub fn clean_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}
