//! Target platform identification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target platform a blueprint is evaluated against.
///
/// `Unix` covers every non-Windows, non-macOS target (Linux, BSDs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    #[serde(rename = "macos")]
    MacOS,
    Unix,
}

impl Platform {
    /// Platform of the running host.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOS
        } else {
            Self::Unix
        }
    }

    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }

    pub fn is_macos(self) -> bool {
        self == Self::MacOS
    }

    /// Linux for packaging purposes: any Unix that is not macOS.
    pub fn is_linux(self) -> bool {
        self == Self::Unix
    }

    /// Suffix appended to executable names (`.exe` on Windows).
    pub fn executable_suffix(self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            _ => "",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Windows => "windows",
            Self::MacOS => "macos",
            Self::Unix => "unix",
        };
        f.write_str(s)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Self::Windows),
            "macos" | "mac" | "darwin" => Ok(Self::MacOS),
            "unix" | "linux" => Ok(Self::Unix),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}
