//! Error types for sync-core

use std::path::PathBuf;

/// Result type for sync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an upload or download.
///
/// Per-file write failures during download are not represented here; they
/// are logged and reported in the download result instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required local file or directory does not exist
    #[error("Not found: {path}")]
    NotFound { path: PathBuf },

    /// The descriptor holding ignore rules and custom files is absent
    #[error("Sync descriptor missing at {path}; run `settings-sync init` first")]
    ConfigurationMissing { path: PathBuf },

    /// The editor's folders could not be located
    #[error("Environment error: {message}")]
    Environment { message: String },

    #[error("Unable to create a new gist: {source}")]
    RemoteCreateFailed {
        #[source]
        source: sync_store::Error,
    },

    #[error("Unable to read gist {id}: {source}")]
    RemoteReadFailed {
        id: String,
        #[source]
        source: sync_store::Error,
    },

    #[error("Unable to save gist {id}: {source}")]
    RemoteWriteFailed {
        id: String,
        #[source]
        source: sync_store::Error,
    },

    /// The remote document belongs to another account
    #[error("Gist is owned by '{owner}', not by the authenticated user '{identity}'")]
    OwnershipMismatch { owner: String, identity: String },

    /// The settings transform rejected the content
    #[error(transparent)]
    Transform(#[from] sync_pragma::Error),

    /// The extension host failed to list, install or remove extensions
    #[error("Extension host error: {message}")]
    ExtensionHost { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from sync-fs
    #[error(transparent)]
    Fs(#[from] sync_fs::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
