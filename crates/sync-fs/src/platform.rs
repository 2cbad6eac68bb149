//! Operating-system classification

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The operating-system families the sync logic distinguishes.
///
/// Only macOS matters for keybinding routing; the other variants are kept
/// for settings annotations that target a specific platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsType {
    Windows,
    Linux,
    Mac,
}

impl OsType {
    /// Classify the platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::Mac
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    pub fn is_mac(&self) -> bool {
        matches!(self, Self::Mac)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Mac => "mac",
        }
    }
}

impl FromStr for OsType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "windows" | "win" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            "mac" | "macos" | "osx" | "darwin" => Ok(Self::Mac),
            other => Err(format!("unknown operating system: {other}")),
        }
    }
}

impl std::fmt::Display for OsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("macos".parse::<OsType>(), Ok(OsType::Mac));
        assert_eq!("Linux".parse::<OsType>(), Ok(OsType::Linux));
        assert_eq!("win".parse::<OsType>(), Ok(OsType::Windows));
        assert!("beos".parse::<OsType>().is_err());
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for os in [OsType::Windows, OsType::Linux, OsType::Mac] {
            assert_eq!(os.to_string().parse::<OsType>(), Ok(os));
        }
    }
}
