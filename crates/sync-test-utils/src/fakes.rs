//! Recording stand-ins for the extension host, transform and notifier.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sync_core::{ExtensionHost, ExtensionRecord, Notifier, Result, SettingsTransform};
use sync_fs::OsType;

/// Extension host that keeps its installed list in memory.
#[derive(Default)]
pub struct RecordingHost {
    installed: Mutex<Vec<ExtensionRecord>>,
    installs: Mutex<Vec<String>>,
    uninstalls: Mutex<Vec<String>>,
}

impl RecordingHost {
    /// Host with the given identifiers installed.
    pub fn with_installed(ids: &[&str]) -> Self {
        let host = Self::default();
        *host.installed.lock().unwrap() = ids.iter().map(|id| ExtensionRecord::new(*id)).collect();
        host
    }

    pub fn installs(&self) -> Vec<String> {
        self.installs.lock().unwrap().clone()
    }

    pub fn uninstalls(&self) -> Vec<String> {
        self.uninstalls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtensionHost for RecordingHost {
    async fn installed(&self) -> Result<Vec<ExtensionRecord>> {
        Ok(self.installed.lock().unwrap().clone())
    }

    async fn install(&self, extension: &ExtensionRecord) -> Result<()> {
        self.installs.lock().unwrap().push(extension.identifier.clone());
        self.installed.lock().unwrap().push(extension.clone());
        Ok(())
    }

    async fn uninstall(&self, extension: &ExtensionRecord) -> Result<()> {
        self.uninstalls.lock().unwrap().push(extension.identifier.clone());
        self.installed
            .lock()
            .unwrap()
            .retain(|e| e.identifier != extension.identifier);
        Ok(())
    }
}

/// Pass-through transform that counts its invocations.
#[derive(Default)]
pub struct CountingTransform {
    uploads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingTransform {
    pub fn upload_calls(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SettingsTransform for CountingTransform {
    fn before_upload(&self, content: &str) -> Result<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(content.to_string())
    }

    fn before_write(
        &self,
        _existing_local: Option<&str>,
        incoming: &str,
        _os: OsType,
        _host: Option<&str>,
    ) -> Result<String> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(incoming.to_string())
    }
}

/// Notifier that keeps every message.
#[derive(Default)]
pub struct RecordingNotifier {
    infos: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
