//! Error types for sync-store

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Document not found: {id}")]
    NotFound { id: String },

    #[error("Authentication failed: the token was rejected")]
    Unauthorized,

    #[error("Remote API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode remote response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
