//! Platform symbol-file location strategies.
//!
//! Each platform stores debug information next to its binaries under a
//! different convention. One strategy is selected at the start of a
//! reconciliation run and applied to every binary.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::platform::Platform;

/// Derives the expected symbol-file path for an installed binary.
pub trait SymbolLocator {
    fn symbol_file(&self, installed: &Path) -> PathBuf;
}

/// Pick the strategy for a platform.
pub fn locator_for(platform: Platform) -> Box<dyn SymbolLocator> {
    match platform {
        Platform::Windows => Box::new(WindowsPdb),
        Platform::MacOS => Box::new(MacDsym),
        Platform::Unix => Box::new(UnixDebug),
    }
}

/// Windows: `<binary>.pdb`, falling back to the pdb named in the binary's
/// CodeView debug record, looked up beside the binary.
#[derive(Debug)]
pub struct WindowsPdb;

impl SymbolLocator for WindowsPdb {
    fn symbol_file(&self, installed: &Path) -> PathBuf {
        let adjacent = suffixed(installed, ".pdb");
        if adjacent.exists() {
            return adjacent;
        }
        if let Ok(Some(referenced)) = pdb_for_binary(installed) {
            if let Some(parent) = installed.parent() {
                return parent.join(referenced);
            }
        }
        adjacent
    }
}

/// macOS: the dSYM bundle sits next to the outermost `.framework` / `.app`
/// bundle the binary lives in (or next to the binary itself outside bundles).
#[derive(Debug)]
pub struct MacDsym;

impl SymbolLocator for MacDsym {
    fn symbol_file(&self, installed: &Path) -> PathBuf {
        let mut debug_root = installed.to_path_buf();
        for ancestor in installed.ancestors().skip(1) {
            let is_bundle = ancestor.extension().is_some_and(|e| e == "framework" || e == "app");
            if is_bundle {
                debug_root = ancestor.to_path_buf();
            }
        }
        let name = installed.file_name().unwrap_or_default();
        suffixed(&debug_root, ".dSYM")
            .join("Contents/Resources/DWARF")
            .join(name)
    }
}

/// Other Unix: `<binary>.debug`.
#[derive(Debug)]
pub struct UnixDebug;

impl SymbolLocator for UnixDebug {
    fn symbol_file(&self, installed: &Path) -> PathBuf {
        suffixed(installed, ".debug")
    }
}

/// Append a suffix to the last path component (`foo.dll` -> `foo.dll.pdb`).
fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// CodeView RSDS record: "RSDS" + 16-byte GUID + 4-byte age + NUL-terminated
/// pdb path.
const RSDS_MAGIC: &[u8; 4] = b"RSDS";
const RSDS_HEADER_LEN: usize = 4 + 16 + 4;

/// Name of the pdb a PE binary references in its debug directory, if any.
///
/// Scans the image for an RSDS CodeView record and extracts the file name of
/// the embedded pdb path.
pub fn pdb_for_binary(binary: &Path) -> std::io::Result<Option<PathBuf>> {
    let data = fs::read(binary)?;
    let mut offset = 0;
    while let Some(found) = find(&data[offset..], RSDS_MAGIC) {
        let record = offset + found;
        offset = record + 4;
        let path_start = record + RSDS_HEADER_LEN;
        if path_start >= data.len() {
            continue;
        }
        let rest = &data[path_start..];
        let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        let raw = String::from_utf8_lossy(&rest[..end]);
        if !raw.to_ascii_lowercase().ends_with(".pdb") {
            continue;
        }
        // The embedded path uses the build machine's separators.
        let name = raw.rsplit(['/', '\\']).next().unwrap_or(&raw);
        return Ok(Some(PathBuf::from(name)));
    }
    Ok(None)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RSDS record referencing the given pdb path.
    pub(crate) fn rsds_record(pdb_path: &str) -> Vec<u8> {
        let mut record = Vec::new();
        record.extend_from_slice(RSDS_MAGIC);
        record.extend_from_slice(&[0u8; 16]); // GUID
        record.extend_from_slice(&1u32.to_le_bytes()); // age
        record.extend_from_slice(pdb_path.as_bytes());
        record.push(0);
        record
    }

    #[test]
    fn test_unix_debug_suffix() {
        let locator = UnixDebug;
        assert_eq!(
            locator.symbol_file(Path::new("/install/bin/foo")),
            Path::new("/install/bin/foo.debug")
        );
    }

    #[test]
    fn test_mac_bundle_dsym() {
        let locator = MacDsym;
        assert_eq!(
            locator.symbol_file(Path::new("/install/App.app/Contents/MacOS/App")),
            Path::new("/install/App.app.dSYM/Contents/Resources/DWARF/App")
        );
    }

    #[test]
    fn test_mac_outermost_bundle_wins() {
        let locator = MacDsym;
        assert_eq!(
            locator.symbol_file(Path::new(
                "/install/Outer.app/Contents/Frameworks/Inner.framework/Versions/A/Inner"
            )),
            Path::new("/install/Outer.app.dSYM/Contents/Resources/DWARF/Inner")
        );
    }

    #[test]
    fn test_mac_plain_binary_outside_bundle() {
        let locator = MacDsym;
        assert_eq!(
            locator.symbol_file(Path::new("/install/bin/tool")),
            Path::new("/install/bin/tool.dSYM/Contents/Resources/DWARF/tool")
        );
    }

    #[test]
    fn test_windows_prefers_adjacent_pdb() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = tmp.path().join("app.exe");
        fs::write(&binary, b"MZ junk").unwrap();
        fs::write(tmp.path().join("app.exe.pdb"), b"pdb").unwrap();

        let locator = WindowsPdb;
        assert_eq!(locator.symbol_file(&binary), tmp.path().join("app.exe.pdb"));
    }

    #[test]
    fn test_windows_probes_rsds_record() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = tmp.path().join("app.exe");
        let mut blob = vec![0u8; 32];
        blob.extend_from_slice(&rsds_record(r"C:\builds\release\app.pdb"));
        fs::write(&binary, blob).unwrap();

        let locator = WindowsPdb;
        assert_eq!(locator.symbol_file(&binary), tmp.path().join("app.pdb"));
    }

    #[test]
    fn test_windows_no_reference_falls_back_to_adjacent_name() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = tmp.path().join("app.exe");
        fs::write(&binary, b"MZ junk without a record").unwrap();

        let locator = WindowsPdb;
        assert_eq!(locator.symbol_file(&binary), tmp.path().join("app.exe.pdb"));
    }

    #[test]
    fn test_pdb_for_binary_ignores_non_pdb_strings() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = tmp.path().join("app.exe");
        let mut blob = rsds_record("not-a-pdb.txt");
        blob.extend_from_slice(&rsds_record(r"out\real.pdb"));
        fs::write(&binary, blob).unwrap();

        assert_eq!(pdb_for_binary(&binary).unwrap(), Some(PathBuf::from("real.pdb")));
    }
}
