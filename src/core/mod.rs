//! Blueprint descriptors and the data they produce.

pub mod blueprint;
pub mod defines;
pub mod options;
pub mod platform;
pub mod version;
