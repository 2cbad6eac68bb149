//! Filesystem primitives for settings-sync
//!
//! Provides normalized paths, flat remote-key conversion, atomic writes and a
//! format-agnostic configuration store.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod platform;

pub use config::ConfigStore;
pub use constants::{CUSTOMIZED_SYNC_PREFIX, KEY_DELIMITER, UserFile};
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use platform::OsType;
