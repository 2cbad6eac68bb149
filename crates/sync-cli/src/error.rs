//! Error types for sync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from sync-core
    #[error(transparent)]
    Core(#[from] sync_core::Error),

    /// Error from sync-fs
    #[error(transparent)]
    Fs(#[from] sync_fs::Error),

    /// Error from sync-store
    #[error(transparent)]
    Store(#[from] sync_store::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
