//! Packaging define map.
//!
//! The downstream packagers (NSIS, macOS pkgproj, AppImage) consume a flat
//! key/value map describing the application being packaged. This module
//! assembles that map from a blueprint, its options, and a resolved version.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::blueprint::Blueprint;
use crate::core::options::Options;
use crate::core::platform::Platform;

/// Start-menu / desktop shortcut entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Shortcut {
    pub name: String,
    pub target: String,
    pub description: String,
}

/// Flavor of packager the defines are being produced for. The NSIS installer
/// resolves shortcut targets against the package root, so executables need
/// their `bin/` prefix there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagerFlavor {
    Nullsoft,
    Other,
}

/// Define map handed to the downstream packagers.
#[derive(Debug, Clone, Serialize)]
pub struct DefineMap {
    pub appname: String,
    pub appimage_native_package_name: String,
    pub apppath: String,
    pub company: String,
    pub shortcuts: Vec<Shortcut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pkgproj: Option<PathBuf>,
    /// Blacklist file resolved against the blueprint directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<PathBuf>,
    /// Regex of executables to drop from the package, `${appname}` expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Executable name resolution, environment first.
///
/// `ApplicationExecutable` / `APPLICATION_EXECUTABLE` override the blueprint;
/// the short name follows the same scheme.
fn env_vars(names: &[&str]) -> Option<String> {
    names.iter().find_map(|n| std::env::var(n).ok())
}

pub fn application_executable(blueprint: &Blueprint) -> String {
    env_vars(&["ApplicationExecutable", "APPLICATION_EXECUTABLE"])
        .unwrap_or_else(|| blueprint.package.display().to_string())
}

pub fn application_shortname(blueprint: &Blueprint) -> String {
    env_vars(&["ApplicationShortname", "APPLICATION_SHORTNAME"])
        .unwrap_or_else(|| blueprint.package.display().to_string())
}

impl DefineMap {
    /// Assemble the define map for one packaging run.
    pub fn assemble(
        blueprint: &Blueprint,
        _options: &Options,
        platform: Platform,
        flavor: PackagerFlavor,
        build_dir: &Path,
        blueprint_dir: &Path,
        version: Option<String>,
    ) -> Self {
        let appname = application_executable(blueprint);
        let shortname = application_shortname(blueprint);

        let exe = format!("{appname}{}", platform.executable_suffix());
        let target = match flavor {
            PackagerFlavor::Nullsoft => format!("bin/{exe}"),
            PackagerFlavor::Other => exe,
        };

        let icon = (!blueprint.packaging.icon.is_empty())
            .then(|| build_dir.join(&blueprint.packaging.icon));
        let pkgproj = (!blueprint.packaging.pkgproj.is_empty())
            .then(|| build_dir.join(&blueprint.packaging.pkgproj));
        let blacklist = (!blueprint.packaging.blacklist.is_empty())
            .then(|| blueprint_dir.join(&blueprint.packaging.blacklist));
        let executable_filter = (!blueprint.packaging.executable_filter.is_empty())
            .then(|| blueprint.packaging.executable_filter.replace("${appname}", &appname));

        Self {
            apppath: format!("Applications/KDE/{appname}.app"),
            appimage_native_package_name: format!(
                "{}-client",
                shortname.to_lowercase().replace('_', "-")
            ),
            company: blueprint.packaging.company.clone(),
            shortcuts: vec![Shortcut {
                name: blueprint.package.display().to_string(),
                target,
                description: blueprint.package.description.clone(),
            }],
            icon,
            pkgproj,
            blacklist,
            executable_filter,
            version,
            appname,
        }
    }

    /// JSON payload for downstream packagers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::blueprint::Blueprint;

    fn blueprint() -> Blueprint {
        Blueprint::from_toml(
            r#"
[package]
name = "tine-drive-client"
display_name = "tineDrive"
description = "tineDrive Desktop Client"

[targets]
git_url = "https://github.com/tine20/tineDrive"

[packaging]
company = "Metaways Infosystems GmbH"
icon = "src/gui/tineDrive.ico"
pkgproj = "admin/osx/macosx.pkgproj"
blacklist = "blacklist.txt"
executable_filter = "(bin|libexec)/(?!(${appname})).*"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_assemble_defines() {
        let bp = blueprint();
        let opts = bp.default_options();
        let defines = DefineMap::assemble(
            &bp,
            &opts,
            Platform::Unix,
            PackagerFlavor::Other,
            Path::new("/build/tine"),
            Path::new("/blueprints/tine-drive"),
            Some("5.0.0".to_string()),
        );

        assert_eq!(defines.appname, "tineDrive");
        assert_eq!(defines.apppath, "Applications/KDE/tineDrive.app");
        assert_eq!(defines.appimage_native_package_name, "tinedrive-client");
        assert_eq!(defines.version.as_deref(), Some("5.0.0"));
        assert_eq!(defines.icon.as_deref(), Some(Path::new("/build/tine/src/gui/tineDrive.ico")));
        assert_eq!(defines.shortcuts[0].target, "tineDrive");
    }

    #[test]
    fn test_nullsoft_shortcut_target_is_under_bin() {
        let bp = blueprint();
        let opts = bp.default_options();
        let defines = DefineMap::assemble(
            &bp,
            &opts,
            Platform::Windows,
            PackagerFlavor::Nullsoft,
            Path::new("/build/tine"),
            Path::new("/blueprints/tine-drive"),
            None,
        );
        assert_eq!(defines.shortcuts[0].target, "bin/tineDrive.exe");
    }

    #[test]
    fn test_blacklist_and_executable_filter() {
        let bp = blueprint();
        let opts = bp.default_options();
        let defines = DefineMap::assemble(
            &bp,
            &opts,
            Platform::Unix,
            PackagerFlavor::Other,
            Path::new("/build/tine"),
            Path::new("/blueprints/tine-drive"),
            None,
        );

        assert_eq!(
            defines.blacklist.as_deref(),
            Some(Path::new("/blueprints/tine-drive/blacklist.txt"))
        );
        assert_eq!(
            defines.executable_filter.as_deref(),
            Some("(bin|libexec)/(?!(tineDrive)).*")
        );
    }
}
