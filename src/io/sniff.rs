//! Content-based binary classification.
//!
//! Whether a file is an executable or shared library is decided by its magic
//! bytes, never by extension: packaged trees routinely contain extensionless
//! executables and `.dll`-named data files.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// ELF magic: 0x7f 'E' 'L' 'F'
const ELF_MAGIC: [u8; 4] = [0x7f, 0x45, 0x4c, 0x46];

/// Mach-O magics: 32/64-bit, both byte orders, plus fat binaries.
const MACHO_MAGICS: [[u8; 4]; 6] = [
    [0xfe, 0xed, 0xfa, 0xce], // MH_MAGIC
    [0xce, 0xfa, 0xed, 0xfe], // MH_CIGAM
    [0xfe, 0xed, 0xfa, 0xcf], // MH_MAGIC_64
    [0xcf, 0xfa, 0xed, 0xfe], // MH_CIGAM_64
    [0xca, 0xfe, 0xba, 0xbe], // FAT_MAGIC
    [0xbe, 0xba, 0xfe, 0xca], // FAT_CIGAM
];

/// DOS header magic 'MZ'; a real PE additionally carries "PE\0\0" at e_lfanew.
const DOS_MAGIC: [u8; 2] = [0x4d, 0x5a];
const PE_SIGNATURE: [u8; 4] = [0x50, 0x45, 0x00, 0x00];

/// True if the file is an ELF, Mach-O, or PE image.
pub fn is_binary(path: &Path) -> io::Result<bool> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    let mut head = [0u8; 64];
    let n = read_up_to(&mut file, &mut head)?;
    if n < 4 {
        return Ok(false);
    }

    if head[..4] == ELF_MAGIC {
        return Ok(true);
    }
    if MACHO_MAGICS.iter().any(|m| &head[..4] == m) {
        return Ok(true);
    }
    if head[..2] == DOS_MAGIC && n >= 64 {
        // e_lfanew lives at offset 0x3c
        let e_lfanew = u32::from_le_bytes([head[0x3c], head[0x3d], head[0x3e], head[0x3f]]);
        let mut sig = [0u8; 4];
        if file.seek(SeekFrom::Start(u64::from(e_lfanew))).is_ok()
            && read_up_to(&mut file, &mut sig)? == 4
            && sig == PE_SIGNATURE
        {
            return Ok(true);
        }
    }

    Ok(false)
}

fn read_up_to(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = file.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_elf_is_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prog");
        fs::write(&path, testutil::elf_image()).unwrap();
        assert!(is_binary(&path).unwrap());
    }

    #[test]
    fn test_macho_is_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prog");
        fs::write(&path, testutil::macho_image()).unwrap();
        assert!(is_binary(&path).unwrap());
    }

    #[test]
    fn test_pe_is_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prog.dll");
        fs::write(&path, testutil::pe_image(&[])).unwrap();
        assert!(is_binary(&path).unwrap());
    }

    #[test]
    fn test_mz_without_pe_signature_is_not_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data.dll");
        let mut blob = vec![0u8; 128];
        blob[0] = 0x4d;
        blob[1] = 0x5a;
        fs::write(&path, blob).unwrap();
        assert!(!is_binary(&path).unwrap());
    }

    #[test]
    fn test_text_is_not_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("script.sh");
        fs::write(&path, b"#!/bin/sh\necho hi\n").unwrap();
        assert!(!is_binary(&path).unwrap());
    }

    #[test]
    fn test_short_file_is_not_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tiny");
        fs::write(&path, b"MZ").unwrap();
        assert!(!is_binary(&path).unwrap());
    }
}
