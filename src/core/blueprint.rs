//! TOML blueprint parsing.
//!
//! Human-readable component descriptors for the Craft orchestrator.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::options::{Options, OptionValue};
use crate::core::platform::Platform;

#[derive(Error, Debug)]
pub enum BlueprintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid blueprint: {0}")]
    Invalid(String),
}

/// Component metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub webpage: String,
}

impl PackageInfo {
    /// Display name, falling back to the package name.
    pub fn display(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// Where the component's source comes from.
///
/// `${VERSION}` in the tarball fields is substituted when a concrete
/// version is chosen by the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Targets {
    #[serde(default)]
    pub tarball_url: String,
    #[serde(default)]
    pub tarball_install_src: String,
    #[serde(default)]
    pub git_url: String,
    /// Version the orchestrator builds when none is requested.
    #[serde(default)]
    pub default_target: String,
}

impl Targets {
    /// Tarball URL for a concrete version.
    pub fn tarball_url_for(&self, version: &str) -> String {
        self.tarball_url.replace("${VERSION}", version)
    }

    /// Directory inside the tarball for a concrete version.
    pub fn install_src_for(&self, version: &str) -> String {
        self.tarball_install_src.replace("${VERSION}", version)
    }
}

/// Condition gating a dependency, configure, or packaging block.
///
/// All present fields must hold for the block to apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct When {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_platform: Option<Platform>,
    /// Name of a dynamic option that must be enabled (flag true or text non-empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
}

impl When {
    pub fn holds(&self, platform: Platform, options: &Options) -> bool {
        if let Some(p) = self.platform {
            if p != platform {
                return false;
            }
        }
        if let Some(p) = self.not_platform {
            if p == platform {
                return false;
            }
        }
        if let Some(name) = &self.option {
            if !options.enabled(name) {
                return false;
            }
        }
        true
    }
}

/// Build-time and run-time dependency names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencySet {
    #[serde(default)]
    pub build: Vec<String>,
    #[serde(default)]
    pub runtime: Vec<String>,
}

/// A dependency block that only applies when its condition holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalDeps {
    #[serde(default)]
    pub when: When,
    #[serde(flatten)]
    pub deps: DependencySet,
}

/// Declared dependencies: an unconditional set plus gated blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dependencies {
    #[serde(default)]
    pub build: Vec<String>,
    #[serde(default)]
    pub runtime: Vec<String>,
    #[serde(default)]
    pub conditional: Vec<ConditionalDeps>,
}

/// Dependencies after condition evaluation, declaration order, de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDependencies {
    pub build: Vec<String>,
    pub runtime: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

impl Dependencies {
    /// Union of the unconditional set and every block whose condition holds.
    pub fn resolved(&self, platform: Platform, options: &Options) -> ResolvedDependencies {
        let mut out = ResolvedDependencies::default();
        for name in &self.build {
            push_unique(&mut out.build, name);
        }
        for name in &self.runtime {
            push_unique(&mut out.runtime, name);
        }
        for block in &self.conditional {
            if !block.when.holds(platform, options) {
                continue;
            }
            for name in &block.deps.build {
                push_unique(&mut out.build, name);
            }
            for name in &block.deps.runtime {
                push_unique(&mut out.runtime, name);
            }
        }
        out
    }
}

/// A configure-argument block gated by a condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigureFragment {
    #[serde(default)]
    pub when: When,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Configure-flag assembly.
///
/// Arguments may reference option values as `${option_name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configure {
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variable whose whitespace-separated content is appended.
    #[serde(default)]
    pub extra_args_env: String,
    #[serde(default)]
    pub conditional: Vec<ConfigureFragment>,
}

impl Configure {
    /// Final argument list for a platform and option set.
    pub fn args(&self, platform: Platform, options: &Options) -> Vec<String> {
        let mut out: Vec<String> = self.args.clone();
        if !self.extra_args_env.is_empty() {
            if let Ok(extra) = std::env::var(&self.extra_args_env) {
                out.extend(extra.split_whitespace().map(str::to_string));
            }
        }
        for fragment in &self.conditional {
            if fragment.when.holds(platform, options) {
                out.extend(fragment.args.iter().map(|a| expand_options(a, options)));
            }
        }
        out
    }
}

fn expand_options(template: &str, options: &Options) -> String {
    let mut out = template.to_string();
    for (name, value) in options.iter() {
        let placeholder = format!("${{{name}}}");
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, &value.to_string());
        }
    }
    out
}

/// A gated ignored-package block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreBlock {
    #[serde(default)]
    pub when: When,
    #[serde(default)]
    pub packages: Vec<String>,
}

/// Packaging metadata consumed by the downstream packagers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Packaging {
    #[serde(default)]
    pub company: String,
    /// Icon path relative to the build directory.
    #[serde(default)]
    pub icon: String,
    /// macOS pkgproj path relative to the build directory.
    #[serde(default)]
    pub pkgproj: String,
    /// Blacklist file name relative to the blueprint directory.
    #[serde(default)]
    pub blacklist: String,
    /// Executable filter regex template (`${appname}` expands).
    #[serde(default)]
    pub executable_filter: String,
    #[serde(default)]
    pub ignore: Vec<IgnoreBlock>,
}

impl Packaging {
    /// Packages excluded from the final package on this platform.
    pub fn ignored_packages(&self, platform: Platform, options: &Options) -> Vec<String> {
        let mut out = Vec::new();
        for block in &self.ignore {
            if block.when.holds(platform, options) {
                for name in &block.packages {
                    push_unique(&mut out, name);
                }
            }
        }
        out
    }
}

/// Declared dynamic options with defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionDecls {
    #[serde(default)]
    pub flags: std::collections::BTreeMap<String, bool>,
    #[serde(default)]
    pub values: std::collections::BTreeMap<String, String>,
}

/// Complete blueprint document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    pub package: PackageInfo,
    #[serde(default)]
    pub targets: Targets,
    #[serde(default)]
    pub options: OptionDecls,
    #[serde(default)]
    pub dependencies: Dependencies,
    #[serde(default)]
    pub configure: Configure,
    #[serde(default)]
    pub packaging: Packaging,
}

impl Blueprint {
    /// Parse a blueprint from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, BlueprintError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a blueprint from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, BlueprintError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Dynamic options with their declared defaults.
    pub fn default_options(&self) -> Options {
        let mut opts = Options::new();
        for (name, default) in &self.options.flags {
            opts.register(name, OptionValue::Flag(*default));
        }
        for (name, default) in &self.options.values {
            opts.register(name, OptionValue::Text(default.clone()));
        }
        opts
    }

    /// Structural checks beyond what the TOML schema enforces.
    pub fn validate(&self) -> Result<(), BlueprintError> {
        if self.package.name.is_empty() {
            return Err(BlueprintError::Invalid("package.name is empty".into()));
        }
        if self.targets.tarball_url.is_empty() && self.targets.git_url.is_empty() {
            return Err(BlueprintError::Invalid(format!(
                "{}: neither targets.tarball_url nor targets.git_url is set",
                self.package.name
            )));
        }
        let opts = self.default_options();
        let check_when = |ctx: &str, when: &When| -> Result<(), BlueprintError> {
            if let Some(name) = &when.option {
                if !opts.is_declared(name) {
                    return Err(BlueprintError::Invalid(format!(
                        "{}: {ctx} references undeclared option {name}",
                        self.package.name
                    )));
                }
            }
            Ok(())
        };
        for block in &self.dependencies.conditional {
            check_when("dependencies.conditional", &block.when)?;
        }
        for fragment in &self.configure.conditional {
            check_when("configure.conditional", &fragment.when)?;
        }
        for block in &self.packaging.ignore {
            check_when("packaging.ignore", &block.when)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_BLUEPRINT: &str = r#"
[package]
name = "tine-drive-client"
display_name = "tineDrive"
description = "tineDrive Desktop Client"
webpage = "https://www.tine-groupware.de"

[targets]
tarball_url = "https://download.tineDrive.com/desktop/stable/tineDriveclient-${VERSION}.tar.xz"
tarball_install_src = "tineDriveclient-${VERSION}"
git_url = "https://github.com/tine20/tineDrive"

[options.flags]
build_vfs_win = false
enable_crash_reporter = false

[options.values]
build_number = ""

[dependencies]
build = ["dev-utils/cmake"]
runtime = ["libs/zlib", "libs/sqlite"]

[[dependencies.conditional]]
when = { platform = "windows" }
build = ["libs/nlohmann-json"]

[[dependencies.conditional]]
when = { option = "enable_crash_reporter" }
build = ["dev-utils/breakpad", "dev-utils/symsorter"]
runtime = ["tine-drive/libcrashreporter-qt"]

[[configure.conditional]]
when = { option = "enable_crash_reporter" }
args = ["-DWITH_CRASHREPORTER=ON"]

[[configure.conditional]]
when = { option = "build_number" }
args = ["-DMIRALL_VERSION_BUILD=${build_number}"]

[packaging]
company = "Metaways Infosystems GmbH"
icon = "src/gui/tineDrive.ico"

[[packaging.ignore]]
packages = ["binary/mysql"]

[[packaging.ignore]]
when = { not_platform = "unix" }
packages = ["libs/dbus"]
"#;

    #[test]
    fn test_parse_blueprint() {
        let bp = Blueprint::from_toml(EXAMPLE_BLUEPRINT).unwrap();
        assert_eq!(bp.package.name, "tine-drive-client");
        assert_eq!(bp.package.display(), "tineDrive");
        assert_eq!(bp.dependencies.runtime.len(), 2);
        assert_eq!(bp.dependencies.conditional.len(), 2);
        bp.validate().unwrap();
    }

    #[test]
    fn test_tarball_expansion() {
        let bp = Blueprint::from_toml(EXAMPLE_BLUEPRINT).unwrap();
        assert_eq!(
            bp.targets.tarball_url_for("5.0.0"),
            "https://download.tineDrive.com/desktop/stable/tineDriveclient-5.0.0.tar.xz"
        );
        assert_eq!(bp.targets.install_src_for("5.0.0"), "tineDriveclient-5.0.0");
    }

    #[test]
    fn test_resolved_dependencies_by_platform() {
        let bp = Blueprint::from_toml(EXAMPLE_BLUEPRINT).unwrap();
        let opts = bp.default_options();

        let unix = bp.dependencies.resolved(Platform::Unix, &opts);
        assert!(!unix.build.iter().any(|d| d == "libs/nlohmann-json"));

        let win = bp.dependencies.resolved(Platform::Windows, &opts);
        assert!(win.build.iter().any(|d| d == "libs/nlohmann-json"));
    }

    #[test]
    fn test_resolved_dependencies_by_option() {
        let bp = Blueprint::from_toml(EXAMPLE_BLUEPRINT).unwrap();
        let mut opts = bp.default_options();
        opts.set("enable_crash_reporter", "true").unwrap();

        let deps = bp.dependencies.resolved(Platform::Unix, &opts);
        assert!(deps.build.iter().any(|d| d == "dev-utils/symsorter"));
        assert!(deps.runtime.iter().any(|d| d == "tine-drive/libcrashreporter-qt"));
    }

    #[test]
    fn test_configure_args_expand_option_values() {
        let bp = Blueprint::from_toml(EXAMPLE_BLUEPRINT).unwrap();
        let mut opts = bp.default_options();
        opts.set("build_number", "42").unwrap();
        opts.set("enable_crash_reporter", "true").unwrap();

        let args = bp.configure.args(Platform::Unix, &opts);
        assert!(args.contains(&"-DWITH_CRASHREPORTER=ON".to_string()));
        assert!(args.contains(&"-DMIRALL_VERSION_BUILD=42".to_string()));
    }

    #[test]
    fn test_configure_args_skip_disabled_options() {
        let bp = Blueprint::from_toml(EXAMPLE_BLUEPRINT).unwrap();
        let opts = bp.default_options();
        let args = bp.configure.args(Platform::Unix, &opts);
        assert!(args.is_empty());
    }

    #[test]
    fn test_ignored_packages() {
        let bp = Blueprint::from_toml(EXAMPLE_BLUEPRINT).unwrap();
        let opts = bp.default_options();

        let mac = bp.packaging.ignored_packages(Platform::MacOS, &opts);
        assert!(mac.contains(&"libs/dbus".to_string()));

        let linux = bp.packaging.ignored_packages(Platform::Unix, &opts);
        assert!(!linux.contains(&"libs/dbus".to_string()));
        assert!(linux.contains(&"binary/mysql".to_string()));
    }

    #[test]
    fn test_validate_rejects_undeclared_option() {
        let bad = r#"
[package]
name = "x"

[targets]
git_url = "https://example.com/x.git"

[[dependencies.conditional]]
when = { option = "nope" }
build = ["dev-utils/cmake"]
"#;
        let bp = Blueprint::from_toml(bad).unwrap();
        assert!(matches!(bp.validate(), Err(BlueprintError::Invalid(_))));
    }
}
