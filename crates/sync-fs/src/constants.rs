//! Well-known file names inside the editor's user folder.

use std::path::Path;

/// Separator used to flatten nested folders into a single remote key.
pub const KEY_DELIMITER: char = '|';

/// Prefix marking a remote key as an out-of-tree custom file.
pub const CUSTOMIZED_SYNC_PREFIX: &str = "|customized_sync|";

/// Files the sync logic treats specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserFile {
    /// Primary `settings.json`
    Settings,
    /// Canonical local keybindings file, also the non-mac remote key
    Keybindings,
    /// Remote key used for keybindings uploaded from macOS
    KeybindingsMac,
    /// Serialized list of installed extensions
    Extensions,
    /// Local descriptor holding ignore rules and custom mappings
    Descriptor,
    /// Marker document carrying the last upload timestamp
    Marker,
}

impl UserFile {
    /// Get the file name (or remote key) for this file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Settings => "settings.json",
            Self::Keybindings => "keybindings.json",
            Self::KeybindingsMac => "keybindingsMac.json",
            Self::Extensions => "extensions.json",
            Self::Descriptor => "syncLocalSettings.json",
            Self::Marker => "cloudSettings",
        }
    }

    /// Look up a well-known file by exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::Settings,
            Self::Keybindings,
            Self::KeybindingsMac,
            Self::Extensions,
            Self::Descriptor,
            Self::Marker,
        ]
        .into_iter()
        .find(|f| f.as_str() == name)
    }
}

impl AsRef<Path> for UserFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for UserFile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for UserFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
