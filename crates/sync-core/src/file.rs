//! File records and remote key classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sync_fs::{CUSTOMIZED_SYNC_PREFIX, NormalizedPath, UserFile};

/// One file travelling between the local folder and the remote document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Base name of the file
    pub display_name: String,
    pub content: String,
    /// Where the file lives locally; `None` for synthetic records
    pub source_path: Option<NormalizedPath>,
    /// Flattened key inside the remote document
    pub remote_key: String,
}

impl FileRecord {
    pub fn new(
        display_name: impl Into<String>,
        content: impl Into<String>,
        source_path: Option<NormalizedPath>,
        remote_key: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            content: content.into(),
            source_path,
            remote_key: remote_key.into(),
        }
    }

    /// Record for an out-of-tree custom file.
    pub fn custom(name: &str, content: impl Into<String>, path: NormalizedPath) -> Self {
        Self::new(name, content, Some(path), custom_key(name))
    }

    /// Record that has no local file, like the marker document.
    pub fn synthetic(file: UserFile, content: impl Into<String>) -> Self {
        Self::new(file.as_str(), content, None, file.as_str())
    }
}

/// Remote key for a custom file.
pub fn custom_key(name: &str) -> String {
    format!("{CUSTOMIZED_SYNC_PREFIX}{name}")
}

/// Which of the two keybinding files a remote key holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeybindingVariant {
    Default,
    Mac,
}

impl KeybindingVariant {
    pub fn remote_file(&self) -> UserFile {
        match self {
            Self::Default => UserFile::Keybindings,
            Self::Mac => UserFile::KeybindingsMac,
        }
    }
}

/// Classification of a remote key, computed once per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// The primary settings file
    Settings,
    Keybinding(KeybindingVariant),
    /// Out-of-tree file with its logical name
    CustomFile(String),
    ExtensionList,
    Marker,
    /// Ordinary file under the configuration root
    Other,
    /// Never written locally: keys without an extension and the descriptor
    Unsupported,
}

impl Kind {
    pub fn classify(key: &str) -> Self {
        if let Some(name) = key.strip_prefix(CUSTOMIZED_SYNC_PREFIX) {
            return Self::CustomFile(name.to_string());
        }
        match UserFile::from_name(key) {
            Some(UserFile::Marker) => Self::Marker,
            Some(UserFile::Settings) => Self::Settings,
            Some(UserFile::Keybindings) => Self::Keybinding(KeybindingVariant::Default),
            Some(UserFile::KeybindingsMac) => Self::Keybinding(KeybindingVariant::Mac),
            Some(UserFile::Extensions) => Self::ExtensionList,
            Some(UserFile::Descriptor) => Self::Unsupported,
            None if key.contains('.') => Self::Other,
            None => Self::Unsupported,
        }
    }
}

/// Content of the `cloudSettings` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDocument {
    pub last_upload: DateTime<Utc>,
}

impl MarkerDocument {
    pub fn new(last_upload: DateTime<Utc>) -> Self {
        Self { last_upload }
    }

    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Whether a local copy last synced at either timestamp is current.
    ///
    /// Either timestamp matching the remote instant is enough.
    pub fn is_current(
        &self,
        last_download: Option<DateTime<Utc>>,
        last_upload: Option<DateTime<Utc>>,
    ) -> bool {
        last_download == Some(self.last_upload) || last_upload == Some(self.last_upload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("settings.json", Kind::Settings)]
    #[case("keybindings.json", Kind::Keybinding(KeybindingVariant::Default))]
    #[case("keybindingsMac.json", Kind::Keybinding(KeybindingVariant::Mac))]
    #[case("extensions.json", Kind::ExtensionList)]
    #[case("cloudSettings", Kind::Marker)]
    #[case("snippets|go.json", Kind::Other)]
    #[case("|customized_sync|zshrc", Kind::CustomFile("zshrc".into()))]
    #[case("README", Kind::Unsupported)]
    #[case("syncLocalSettings.json", Kind::Unsupported)]
    fn classifies_remote_keys(#[case] key: &str, #[case] expected: Kind) {
        assert_eq!(Kind::classify(key), expected);
    }

    #[test]
    fn custom_key_has_prefix() {
        assert_eq!(custom_key("zshrc"), "|customized_sync|zshrc");
    }

    #[test]
    fn marker_serializes_last_upload() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let json = MarkerDocument::new(at).to_json().unwrap();
        assert_eq!(json, r#"{"lastUpload":"2024-05-01T12:00:00Z"}"#);
        assert_eq!(MarkerDocument::parse(&json).unwrap().last_upload, at);
    }

    #[test]
    fn marker_is_current_when_either_timestamp_matches() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        let marker = MarkerDocument::new(at);

        assert!(marker.is_current(Some(at), None));
        assert!(marker.is_current(Some(earlier), Some(at)));
        assert!(!marker.is_current(Some(earlier), Some(earlier)));
        assert!(!marker.is_current(None, None));
    }
}
