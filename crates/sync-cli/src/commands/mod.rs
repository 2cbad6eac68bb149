//! Command implementations for sync-cli

pub mod download;
pub mod init;
pub mod status;
pub mod upload;

pub use download::run_download;
pub use init::run_init;
pub use status::run_status;
pub use upload::run_upload;
