//! Download reconciliation: the remote document onto the local folder.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sync_fs::{NormalizedPath, UserFile, io};
use sync_store::{DocumentStore, RemoteDocument};
use tokio::task::{self, JoinSet};
use tracing::{debug, info, warn};

use crate::context::SyncContext;
use crate::extensions::{ExtensionDiffer, ExtensionHost, ExtensionRecord};
use crate::file::{FileRecord, KeybindingVariant, Kind, MarkerDocument};
use crate::notify::Notifier;
use crate::settings::CustomSettings;
use crate::transform::SettingsTransform;
use crate::{Error, Result};

/// Options for one download.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadOptions {
    /// Write even when the local copy is current
    pub force_download: bool,
    /// Install and remove extensions to match the remote list
    pub sync_extensions: bool,
    /// Allow removing extensions missing from the remote list
    pub remove_extensions: bool,
}

/// What a download changed.
#[derive(Debug, Clone, Default)]
pub struct DownloadResult {
    /// Records written (or handed to the extension host)
    pub updated_files: Vec<FileRecord>,
    pub added_extensions: Vec<ExtensionRecord>,
    pub deleted_extensions: Vec<ExtensionRecord>,
    /// Upload time read from the remote marker
    pub remote_timestamp: Option<DateTime<Utc>>,
    /// The remote document is public
    pub public: bool,
    /// Remote keys whose local write failed
    pub failed_writes: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    /// Local copy already matches the remote marker
    AlreadyCurrent,
    Updated(DownloadResult),
}

/// A remote entry resolved to a local destination.
struct PlannedWrite {
    kind: Kind,
    record: FileRecord,
    target: NormalizedPath,
}

/// Pulls a document from the store into the local folder.
pub struct Downloader<'a> {
    ctx: &'a SyncContext,
    store: &'a dyn DocumentStore,
    transform: &'a dyn SettingsTransform,
    notifier: &'a dyn Notifier,
    extension_host: Option<&'a dyn ExtensionHost>,
}

impl<'a> Downloader<'a> {
    pub fn new(
        ctx: &'a SyncContext,
        store: &'a dyn DocumentStore,
        transform: &'a dyn SettingsTransform,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            ctx,
            store,
            transform,
            notifier,
            extension_host: None,
        }
    }

    /// Use `host` to apply the remote extension list.
    pub fn with_extension_host(mut self, host: &'a dyn ExtensionHost) -> Self {
        self.extension_host = Some(host);
        self
    }

    /// Download and apply `document_id`.
    ///
    /// Emits one error notification when the operation fails. Individual
    /// write failures are not fatal and are listed in the result.
    pub async fn download(
        &self,
        document_id: &str,
        descriptor: &CustomSettings,
        options: &DownloadOptions,
    ) -> Result<DownloadOutcome> {
        let result = self.pull(document_id, descriptor, options).await;
        if let Err(e) = &result {
            self.notifier.error(&e.to_string());
        }
        result
    }

    async fn pull(
        &self,
        document_id: &str,
        descriptor: &CustomSettings,
        options: &DownloadOptions,
    ) -> Result<DownloadOutcome> {
        let document = self
            .store
            .read_document(document_id)
            .await
            .map_err(|source| Error::RemoteReadFailed {
                id: document_id.to_string(),
                source,
            })?;

        let remote_timestamp = read_marker(&document).map(|m| m.last_upload);
        if let Some(remote) = remote_timestamp {
            let marker = MarkerDocument::new(remote);
            if marker.is_current(descriptor.last_download, descriptor.last_upload)
                && !options.force_download
            {
                info!(id = %document_id, "local settings are current");
                self.notifier
                    .info("You already have the latest version of your settings");
                return Ok(DownloadOutcome::AlreadyCurrent);
            }
        }

        let mut result = DownloadResult {
            remote_timestamp,
            public: document.public,
            ..Default::default()
        };

        let mut writes = JoinSet::new();
        let mut pending: HashMap<task::Id, String> = HashMap::new();
        for planned in self.plan(&document, descriptor) {
            let PlannedWrite {
                kind,
                record,
                target,
            } = planned;

            // The extension list is applied through the host, never written
            if kind == Kind::ExtensionList {
                if options.sync_extensions
                    && self
                        .apply_extensions(&record, descriptor, options, &mut result)
                        .await
                {
                    result.updated_files.push(record);
                }
                continue;
            }

            let content = if kind == Kind::Settings {
                let local = read_local(&target).await;
                match self.transform.before_write(
                    local.as_deref(),
                    &record.content,
                    self.ctx.os(),
                    self.ctx.host_name.as_deref(),
                ) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(key = %record.remote_key, error = %e, "settings transform failed");
                        result.failed_writes.push(record.remote_key.clone());
                        continue;
                    }
                }
            } else {
                record.content.clone()
            };

            let handle = writes.spawn_blocking(move || {
                target
                    .parent()
                    .map_or(Ok(()), |dir| io::create_dir_all(&dir))
                    .and_then(|()| io::write_text(&target, &content))
            });
            pending.insert(handle.id(), record.remote_key.clone());
            result.updated_files.push(record);
        }

        let failed = join_writes(writes, pending).await;
        result.failed_writes.extend(failed);

        if !result.failed_writes.is_empty() {
            result.failed_writes.sort();
            let failed = &result.failed_writes;
            result
                .updated_files
                .retain(|f| !failed.contains(&f.remote_key));
        }

        info!(
            id = %document_id,
            files = result.updated_files.len(),
            failed = result.failed_writes.len(),
            "downloaded settings"
        );
        self.notifier.info("Settings downloaded");
        Ok(DownloadOutcome::Updated(result))
    }

    /// Classify every remote entry and resolve where it goes.
    fn plan(&self, document: &RemoteDocument, descriptor: &CustomSettings) -> Vec<PlannedWrite> {
        let root = self.ctx.root();
        let local_variant = if self.ctx.os().is_mac() {
            KeybindingVariant::Mac
        } else {
            KeybindingVariant::Default
        };
        let mut planned = Vec::new();

        for (key, file) in &document.files {
            if file.content.is_empty() {
                debug!(key = %key, "skipping empty remote file");
                continue;
            }

            let kind = Kind::classify(key);
            let (display_name, target) = match &kind {
                Kind::Marker | Kind::Unsupported => continue,
                Kind::CustomFile(name) => match descriptor.custom_files.get(name) {
                    Some(path) => (name.clone(), NormalizedPath::new(path)),
                    None => {
                        debug!(name = %name, "no local mapping for custom file, skipping");
                        continue;
                    }
                },
                Kind::Keybinding(variant) if *variant != local_variant => {
                    debug!(key = %key, "keybindings for another OS, skipping");
                    continue;
                }
                Kind::Keybinding(_) => (
                    UserFile::Keybindings.as_str().to_string(),
                    self.ctx.env.file(UserFile::Keybindings),
                ),
                Kind::Settings | Kind::ExtensionList | Kind::Other => {
                    match NormalizedPath::from_remote_key(root, key) {
                        Some(target) => {
                            let name = target.file_name().unwrap_or(key.as_str()).to_string();
                            (name, target)
                        }
                        None => {
                            warn!(key = %key, "remote key does not map to a local path, skipping");
                            continue;
                        }
                    }
                }
            };

            let record = FileRecord::new(
                display_name,
                file.content.clone(),
                Some(target.clone()),
                key.clone(),
            );
            planned.push(PlannedWrite {
                kind,
                record,
                target,
            });
        }
        planned
    }

    /// Install and remove extensions to match the remote list.
    ///
    /// Returns whether the list was applied. Failures are logged and never
    /// abort the download.
    async fn apply_extensions(
        &self,
        record: &FileRecord,
        descriptor: &CustomSettings,
        options: &DownloadOptions,
        result: &mut DownloadResult,
    ) -> bool {
        let Some(host) = self.extension_host else {
            warn!("extension sync enabled but no extension host configured");
            return false;
        };

        let remote: Vec<ExtensionRecord> = match serde_json::from_str(&record.content) {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "remote extension list is not valid JSON");
                self.notifier.warn("Remote extension list is unreadable; extensions left as they are");
                return false;
            }
        };
        let installed = match host.installed().await {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "unable to list installed extensions");
                return false;
            }
        };

        let diff = ExtensionDiffer::new(&self.ctx.self_extension_id).diff(
            &remote,
            &installed,
            &descriptor.ignore_rules(),
            options.remove_extensions,
        );

        for ext in diff.to_add {
            match host.install(&ext).await {
                Ok(()) => {
                    info!(id = %ext.identifier, "installed extension");
                    result.added_extensions.push(ext);
                }
                Err(e) => warn!(id = %ext.identifier, error = %e, "install failed"),
            }
        }
        for ext in diff.to_remove {
            match host.uninstall(&ext).await {
                Ok(()) => {
                    info!(id = %ext.identifier, "removed extension");
                    result.deleted_extensions.push(ext);
                }
                Err(e) => warn!(id = %ext.identifier, error = %e, "uninstall failed"),
            }
        }
        true
    }
}

/// Wait for every write and return the keys whose write failed or panicked.
async fn join_writes(
    mut writes: JoinSet<sync_fs::Result<()>>,
    mut pending: HashMap<task::Id, String>,
) -> Vec<String> {
    let mut failed = Vec::new();
    while let Some(joined) = writes.join_next_with_id().await {
        let (id, outcome) = match joined {
            Ok((id, written)) => (id, written.map_err(|e| e.to_string())),
            Err(e) => (e.id(), Err(e.to_string())),
        };
        let key = pending.remove(&id).unwrap_or_default();
        match outcome {
            Ok(()) => debug!(key = %key, "wrote file"),
            Err(e) => {
                warn!(key = %key, error = %e, "failed to write file");
                failed.push(key);
            }
        }
    }
    failed
}

fn read_marker(document: &RemoteDocument) -> Option<MarkerDocument> {
    let content = document.content(UserFile::Marker.as_str())?;
    match MarkerDocument::parse(content) {
        Ok(marker) => Some(marker),
        Err(e) => {
            debug!(error = %e, "remote marker unreadable, treating as absent");
            None
        }
    }
}

async fn read_local(path: &NormalizedPath) -> Option<String> {
    tokio::fs::read_to_string(path.to_native()).await.ok()
}
