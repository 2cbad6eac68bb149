//! Upload and download reconciliation for settings-sync
//!
//! This crate decides which local files go out and which remote files come
//! back:
//!
//! - **Collector**: bounded walk of the editor's user folder
//! - **Upload**: ignore rules, custom files, keybinding remapping, the marker
//! - **Download**: staleness check, key classification, concurrent writes
//! - **Extensions**: diff of the remote list against what is installed
//!
//! # Architecture
//!
//! ```text
//!                 sync-cli
//!                    |
//!                sync-core
//!                    |
//!      +-------------+-------------+
//!      |             |             |
//!   sync-fs     sync-pragma    sync-store
//! ```

pub mod collector;
pub mod context;
pub mod download;
pub mod error;
pub mod extensions;
pub mod file;
pub mod notify;
pub mod settings;
pub mod transform;
pub mod upload;

pub use collector::{DEFAULT_MAX_DEPTH, list_files};
pub use context::{Environment, SELF_EXTENSION_ID, SyncContext};
pub use download::{DownloadOptions, DownloadOutcome, DownloadResult, Downloader};
pub use error::{Error, Result};
pub use extensions::{
    CodeExtensionHost, ExtensionDiff, ExtensionDiffer, ExtensionHost, ExtensionRecord,
    scan_extensions_dir, write_extension_list,
};
pub use file::{FileRecord, KeybindingVariant, Kind, MarkerDocument, custom_key};
pub use notify::{LogNotifier, Notifier};
pub use settings::{CustomSettings, DEFAULT_GIST_DESCRIPTION, IgnoreRules, SyncConfig};
pub use transform::{IdentityTransform, PragmaTransform, SettingsTransform};
pub use upload::{UploadOptions, UploadResponse, Uploader};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn configuration_missing_mentions_init() {
        let error = Error::ConfigurationMissing {
            path: PathBuf::from("/u/syncLocalSettings.json"),
        };
        let display = error.to_string();
        assert!(display.contains("syncLocalSettings.json"), "got: {display}");
        assert!(display.contains("init"), "got: {display}");
    }

    #[test]
    fn ownership_mismatch_names_both_accounts() {
        let error = Error::OwnershipMismatch {
            owner: "alice".into(),
            identity: "bob".into(),
        };
        let display = error.to_string();
        assert!(display.contains("alice") && display.contains("bob"), "got: {display}");
    }
}
