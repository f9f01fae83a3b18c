//! Version-string extraction command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::version::VersionProbe;

pub fn run(
    source_dir: &Path,
    print_var_script: Option<PathBuf>,
    build_number: Option<String>,
) -> Result<()> {
    let script = print_var_script
        .unwrap_or_else(|| PathBuf::from("blueprints/tine-drive/print-var.cmake"));
    let probe = VersionProbe {
        version_file: source_dir.join("VERSION.cmake"),
        print_var_script: script,
        build_number,
    };
    let version = probe.version_string()?;
    println!("{version}");
    Ok(())
}
