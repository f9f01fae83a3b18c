//! craft-blueprints - declarative build blueprints for the Craft orchestrator
//!
//! Blueprints describe one software component each: where its source lives,
//! what it depends on, how it is configured, and how the result is packaged.
//! The heavy machinery (dependency resolution, build execution, the NSIS /
//! pkgproj / AppImage packagers, the installed-package database) lives in the
//! external orchestrator; this crate models the descriptors and the one
//! structured subsystem the blueprints carry themselves: debug-symbol
//! reconciliation.
//!
//! # Architecture
//!
//! - **Descriptors**: `Blueprint` is a plain TOML document; dependency and
//!   configure blocks are gated by `When` conditions evaluated against a
//!   target [`Platform`](core::platform::Platform) and dynamic
//!   [`Options`](core::options::Options).
//! - **Trait seams**: the symbol sorter and the installed-package query are
//!   traits, so the reconciler runs against fakes in tests and against
//!   `symsorter` plus a manifest directory in production.
//! - **Strategy per platform**: symbol-file locations are derived by one
//!   `SymbolLocator` chosen at run start, not by per-file branching.
//!
//! # Directory Layout
//!
//! ```text
//! <craft root>/
//! ├── archive/       # packaged-but-not-yet-installed binaries
//! ├── install/       # final installed layout
//! ├── manifests/     # <group>/<name>.files lists per installed package
//! └── symbols/       # symsorter output (cleared per run)
//! ```

pub mod cmd;
pub mod core;
pub mod io;
pub mod store;
pub mod symbols;

// Re-exports for convenience
pub use crate::core::blueprint::Blueprint;
pub use crate::core::options::Options;
pub use crate::core::platform::Platform;
pub use crate::symbols::{ReconcileReport, ReconcileRequest, reconcile};

use dirs::home_dir;
use std::path::PathBuf;

/// Returns the Craft root directory, or None if the user's home cannot be resolved.
pub fn try_craft_root() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("CRAFT_BP_ROOT") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".craft"))
}

/// Returns the canonical Craft root directory (`~/.craft`).
///
/// # Panics
/// Panics if the home directory cannot be determined.
pub fn craft_root() -> PathBuf {
    try_craft_root().expect("Could not determine home directory")
}

/// Manifest directory: `<root>/manifests`
pub fn manifest_dir() -> PathBuf {
    craft_root().join("manifests")
}

/// Default symbol output directory: `<root>/symbols`
pub fn symbols_dir() -> PathBuf {
    craft_root().join("symbols")
}
