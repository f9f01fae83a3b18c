//! Read-side view of the orchestrator's installed-package database.

pub mod installed;

pub use self::installed::{InstalledQuery, ManifestDir};
