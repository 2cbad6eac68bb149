//! Host-specific annotations for the primary settings file.
//!
//! A settings line can be guarded by an annotation on the line above it:
//!
//! ```text
//! // @sync os=linux,mac host=laptop env=WORK
//! "editor.fontSize": 14,
//! ```
//!
//! Before upload every guarded line is uncommented, so the remote copy is
//! neutral. Before a downloaded file is written, guarded lines are commented
//! out on machines whose OS, host name or environment do not match, and
//! guarded lines that only exist locally are carried over.

pub mod error;
pub mod parser;
pub mod transform;

pub use error::{Error, Result};
pub use parser::{Pragma, parse_pragma, setting_key};
pub use transform::{before_upload, before_write};
