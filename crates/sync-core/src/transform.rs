//! Settings content transform hook.

use sync_fs::OsType;

use crate::Result;

/// Rewrites the primary settings file on its way out and back in.
///
/// Called once per direction, on the primary settings file only.
pub trait SettingsTransform: Send + Sync {
    /// Prepare local content for upload. An error aborts the upload.
    fn before_upload(&self, content: &str) -> Result<String>;

    /// Adapt incoming content to this machine before it is written.
    fn before_write(
        &self,
        existing_local: Option<&str>,
        incoming: &str,
        os: OsType,
        host: Option<&str>,
    ) -> Result<String>;
}

/// Transform driven by `// @sync` annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PragmaTransform;

impl SettingsTransform for PragmaTransform {
    fn before_upload(&self, content: &str) -> Result<String> {
        Ok(sync_pragma::before_upload(content)?)
    }

    fn before_write(
        &self,
        existing_local: Option<&str>,
        incoming: &str,
        os: OsType,
        host: Option<&str>,
    ) -> Result<String> {
        Ok(sync_pragma::before_write(existing_local, incoming, os, host))
    }
}

/// Transform that passes content through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl SettingsTransform for IdentityTransform {
    fn before_upload(&self, content: &str) -> Result<String> {
        Ok(content.to_string())
    }

    fn before_write(
        &self,
        _existing_local: Option<&str>,
        incoming: &str,
        _os: OsType,
        _host: Option<&str>,
    ) -> Result<String> {
        Ok(incoming.to_string())
    }
}
