//! Skip patterns for symbol reconciliation.
//!
//! Some files are allowed to be missing their symbol file or to fail the
//! sorting tool: runtime DLLs we do not build ourselves on Windows, and
//! compiled objects (`*.o`) that structurally carry no debug identifier on
//! the other platforms. The pattern is built once per run and consulted per
//! binary by file name, start-anchored.

use std::path::Path;

use regex::Regex;
use thiserror::Error;

use crate::core::platform::Platform;
use crate::store::installed::InstalledQuery;

/// Windows file names known to ship without symbols.
const WINDOWS_STATIC_SKIPS: &[&str] = &[r"icu\d\d\.dll", r"asprintf-0\.dll", r"b2-1\.dll"];

/// Packages whose installed files are never expected to carry symbols.
pub const WINDOWS_NO_SYMBOL_PACKAGES: &[&str] =
    &["libs/runtime", "libs/d3dcompiler", "libs/gettext"];

/// Compiled objects cannot produce a debug identifier.
const UNIX_STATIC_SKIPS: &[&str] = &[r".*\.o"];

#[derive(Error, Debug)]
pub enum SkipPatternError {
    #[error("Failed to compile skip pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Predicate over file names permitted to fail reconciliation.
#[derive(Debug, Clone)]
pub struct SkipPattern {
    regex: Regex,
}

impl SkipPattern {
    /// Build the pattern for a platform, folding in the installed-file names
    /// of the designated no-symbol packages.
    pub fn for_platform(
        platform: Platform,
        installed: &dyn InstalledQuery,
        no_symbol_packages: &[&str],
    ) -> Result<Self, SkipPatternError> {
        let mut alternatives: Vec<String> = if platform.is_windows() {
            WINDOWS_STATIC_SKIPS.iter().map(|s| (*s).to_string()).collect()
        } else {
            UNIX_STATIC_SKIPS.iter().map(|s| (*s).to_string()).collect()
        };

        if platform.is_windows() {
            for package in no_symbol_packages {
                let Some(files) = installed.files_of(package) else {
                    continue;
                };
                for file in files {
                    if let Some(name) = file.file_name() {
                        alternatives.push(regex::escape(&name.to_string_lossy()));
                    }
                }
            }
        }

        Self::from_alternatives(&alternatives)
    }

    /// Union a list of regex alternatives into one start-anchored pattern.
    pub fn from_alternatives(alternatives: &[String]) -> Result<Self, SkipPatternError> {
        let union = alternatives.join("|");
        let regex = Regex::new(&format!("^(?:{union})"))?;
        Ok(Self { regex })
    }

    /// True if the binary's file name matches the pattern.
    pub fn matches(&self, binary: &Path) -> bool {
        let Some(name) = binary.file_name() else {
            return false;
        };
        self.regex.is_match(&name.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::installed::{MemoryDb, NoInstalledPackages};

    #[test]
    fn test_windows_static_skips() {
        let pattern =
            SkipPattern::for_platform(Platform::Windows, &NoInstalledPackages, &[]).unwrap();
        assert!(pattern.matches(Path::new("bin/icu68.dll")));
        assert!(pattern.matches(Path::new("asprintf-0.dll")));
        assert!(!pattern.matches(Path::new("bin/tineDrive.exe")));
    }

    #[test]
    fn test_windows_folds_in_no_symbol_package_files() {
        let mut db = MemoryDb::new();
        db.insert("libs/runtime", &["bin/libwinpthread-1.dll", "bin/libgcc_s_seh-1.dll"]);

        let pattern =
            SkipPattern::for_platform(Platform::Windows, &db, &["libs/runtime"]).unwrap();
        assert!(pattern.matches(Path::new("libwinpthread-1.dll")));
        assert!(pattern.matches(Path::new("libgcc_s_seh-1.dll")));
        assert!(!pattern.matches(Path::new("libcrafted.dll")));
    }

    #[test]
    fn test_escaped_names_do_not_act_as_regex() {
        let mut db = MemoryDb::new();
        db.insert("libs/gettext", &["bin/intl-8.dll"]);

        let pattern =
            SkipPattern::for_platform(Platform::Windows, &db, &["libs/gettext"]).unwrap();
        assert!(pattern.matches(Path::new("intl-8.dll")));
        // The dot must not match an arbitrary character.
        assert!(!pattern.matches(Path::new("intlX8.dll")));
    }

    #[test]
    fn test_unix_matches_compiled_objects() {
        let pattern =
            SkipPattern::for_platform(Platform::Unix, &NoInstalledPackages, &[]).unwrap();
        assert!(pattern.matches(Path::new("qrc_controls.cpp.o")));
        assert!(!pattern.matches(Path::new("libowncloudsync.so")));
    }

    #[test]
    fn test_match_is_start_anchored() {
        let pattern =
            SkipPattern::for_platform(Platform::Windows, &NoInstalledPackages, &[]).unwrap();
        assert!(!pattern.matches(Path::new("not-icu68.dll")));
    }
}
