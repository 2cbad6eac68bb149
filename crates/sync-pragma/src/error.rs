//! Error types for sync-pragma

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid @sync annotation on line {line}: {message}")]
    InvalidPragma { line: usize, message: String },
}
