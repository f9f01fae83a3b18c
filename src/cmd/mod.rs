//! CLI command implementations.

pub mod check;
pub mod defines;
pub mod show;
pub mod symbols;
pub mod version;
