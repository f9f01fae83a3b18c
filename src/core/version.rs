//! Version-string extraction via CMake.
//!
//! The client's version lives in `VERSION.cmake`; the authoritative way to
//! read it is to let CMake evaluate the file and print one variable through
//! a small `print-var.cmake` helper script.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// One variable lookup against a CMake version file.
#[derive(Debug, Clone)]
pub struct VersionProbe {
    /// The version file, e.g. `<source>/VERSION.cmake`.
    pub version_file: PathBuf,
    /// The `print-var.cmake` helper script.
    pub print_var_script: PathBuf,
    /// Optional build number forwarded as `-DMIRALL_VERSION_BUILD`.
    pub build_number: Option<String>,
}

impl VersionProbe {
    /// Evaluate the version file and return the named variable's value.
    pub fn var(&self, name: &str) -> Result<String> {
        if !self.version_file.exists() {
            bail!("Failed to find {}", self.version_file.display());
        }
        let file_name = self
            .version_file
            .file_name()
            .context("version file has no file name")?;
        let cwd = self
            .version_file
            .parent()
            .context("version file has no parent directory")?;

        let mut command = Command::new("cmake");
        command
            .arg(format!("-DTARGET_SCRIPT={}", file_name.to_string_lossy()))
            .arg(format!("-DTARGET_VAR={name}"));
        if let Some(build) = &self.build_number {
            command.arg(format!("-DMIRALL_VERSION_BUILD={build}"));
        }
        command.arg("-P").arg(&self.print_var_script).current_dir(cwd);

        let output = command.output().context("Failed to execute cmake")?;
        if !output.status.success() {
            bail!(
                "cmake -P {} failed: {}",
                self.print_var_script.display(),
                String::from_utf8_lossy(&output.stderr)
            );
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if value.is_empty() {
            bail!("{name} is empty in {}", self.version_file.display());
        }
        Ok(value)
    }

    /// The full version string (`MIRALL_VERSION_STRING`).
    pub fn version_string(&self) -> Result<String> {
        let version = self.var("MIRALL_VERSION_STRING")?;
        tracing::info!("version string fetched with CMake: {version}");
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_version_file_is_an_error() {
        let probe = VersionProbe {
            version_file: PathBuf::from("/nonexistent/VERSION.cmake"),
            print_var_script: PathBuf::from("/nonexistent/print-var.cmake"),
            build_number: None,
        };
        assert!(probe.var("MIRALL_VERSION_STRING").is_err());
    }
}
