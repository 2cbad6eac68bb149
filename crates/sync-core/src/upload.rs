//! Upload reconciliation: local files into the remote document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sync_fs::{NormalizedPath, UserFile, io};
use sync_store::DocumentStore;
use tracing::{debug, info, warn};

use crate::collector::{DEFAULT_MAX_DEPTH, list_files};
use crate::context::SyncContext;
use crate::extensions::{ExtensionHost, write_extension_list};
use crate::file::{FileRecord, MarkerDocument};
use crate::notify::Notifier;
use crate::settings::CustomSettings;
use crate::transform::SettingsTransform;
use crate::{Error, Result};

/// Options for one upload.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Visibility of a newly created document
    pub public: bool,
    /// Description of a newly created document
    pub description: String,
    /// Refresh `extensions.json` before collecting
    pub sync_extensions: bool,
}

/// What an upload did.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    pub document_id: String,
    /// The document was created by this upload
    pub created: bool,
    /// The remote document is public
    pub public: bool,
    pub files: Vec<FileRecord>,
    pub uploaded_at: DateTime<Utc>,
}

/// Pushes the local configuration to a document store.
pub struct Uploader<'a> {
    ctx: &'a SyncContext,
    store: &'a dyn DocumentStore,
    transform: &'a dyn SettingsTransform,
    notifier: &'a dyn Notifier,
    extension_host: Option<&'a dyn ExtensionHost>,
}

impl<'a> Uploader<'a> {
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

    /// Use `host` to refresh the extension list before collecting.
    pub fn with_extension_host(mut self, host: &'a dyn ExtensionHost) -> Self {
        self.extension_host = Some(host);
        self
    }

    /// Collect, filter and push the whole configuration.
    ///
    /// `document_id` of `None` creates a new document first.
    pub async fn run(
        &self,
        descriptor: &CustomSettings,
        document_id: Option<&str>,
        options: &UploadOptions,
        now: DateTime<Utc>,
    ) -> Result<UploadResponse> {
        let upload_set = match self.prepare(descriptor, options, now).await {
            Ok(set) => set,
            Err(e) => {
                self.notifier.error(&e.to_string());
                return Err(e);
            }
        };
        self.upload(document_id, options, upload_set, now).await
    }

    async fn prepare(
        &self,
        descriptor: &CustomSettings,
        options: &UploadOptions,
        now: DateTime<Utc>,
    ) -> Result<Vec<FileRecord>> {
        self.ensure_descriptor()?;

        if options.sync_extensions {
            if let Some(host) = self.extension_host {
                if let Err(e) = write_extension_list(self.ctx, host, &descriptor.ignore_rules()).await
                {
                    warn!(error = %e, "unable to save extension list");
                    self.notifier.warn("Unable to save the extension list; continuing without it");
                }
            }
        }

        let collected = list_files(
            self.ctx.root(),
            0,
            DEFAULT_MAX_DEPTH,
            &descriptor.supported_file_extensions,
        )?;
        self.build_upload_set(descriptor, collected, now)
    }

    fn ensure_descriptor(&self) -> Result<()> {
        let path = self.ctx.env.descriptor_path();
        if path.is_file() {
            Ok(())
        } else {
            Err(Error::ConfigurationMissing {
                path: path.to_native(),
            })
        }
    }

    /// Filter collected files into the set sent to the store.
    ///
    /// Adds custom files and the marker, remaps keybindings for this OS and
    /// runs the primary settings file through the transform.
    pub fn build_upload_set(
        &self,
        descriptor: &CustomSettings,
        collected: Vec<FileRecord>,
        now: DateTime<Utc>,
    ) -> Result<Vec<FileRecord>> {
        self.ensure_descriptor()?;

        let rules = descriptor.ignore_rules();
        let is_mac = self.ctx.os().is_mac();
        let has_canonical_keybindings = collected
            .iter()
            .any(|f| f.remote_key == UserFile::Keybindings.as_str());
        let mut upload_set = Vec::new();

        for (name, path) in &descriptor.custom_files {
            let path = NormalizedPath::new(path);
            match io::read_text_if_exists(&path)? {
                Some(content) => upload_set.push(FileRecord::custom(name, content, path)),
                None => debug!(name = %name, path = %path, "custom file not found, skipping"),
            }
        }

        for mut file in collected {
            if let Some(path) = &file.source_path {
                if rules.excludes_file(&file.display_name, path) {
                    debug!(key = %file.remote_key, "ignored by descriptor");
                    continue;
                }
            }
            if file.display_name == UserFile::Descriptor.as_str() {
                continue;
            }
            if file.content.is_empty() {
                debug!(key = %file.remote_key, "skipping empty file");
                continue;
            }

            match UserFile::from_name(&file.remote_key) {
                Some(UserFile::Keybindings) => {
                    file.remote_key = self.ctx.env.keybinding_key().as_str().to_string();
                }
                Some(UserFile::KeybindingsMac) if !is_mac || has_canonical_keybindings => {
                    debug!("skipping local macOS keybindings file");
                    continue;
                }
                Some(UserFile::Settings) => {
                    file.content = self.transform.before_upload(&file.content)?;
                }
                _ => {}
            }
            upload_set.push(file);
        }

        let marker = MarkerDocument::new(now).to_json()?;
        upload_set.push(FileRecord::synthetic(UserFile::Marker, marker));
        Ok(upload_set)
    }

    /// Push a prepared set, creating the document when there is no id.
    ///
    /// Emits one error notification on failure. The remote is untouched
    /// unless the final write succeeds.
    pub async fn upload(
        &self,
        document_id: Option<&str>,
        options: &UploadOptions,
        upload_set: Vec<FileRecord>,
        now: DateTime<Utc>,
    ) -> Result<UploadResponse> {
        let result = self.push(document_id, options, upload_set, now).await;
        if let Err(e) = &result {
            self.notifier.error(&e.to_string());
        }
        result
    }

    async fn push(
        &self,
        document_id: Option<&str>,
        options: &UploadOptions,
        upload_set: Vec<FileRecord>,
        now: DateTime<Utc>,
    ) -> Result<UploadResponse> {
        let existing = document_id.map(str::trim).filter(|id| !id.is_empty());
        let (id, created) = match existing {
            Some(id) => (id.to_string(), false),
            None => {
                let id = self
                    .store
                    .create_document(options.public, &options.description)
                    .await
                    .map_err(|source| Error::RemoteCreateFailed { source })?;
                info!(id = %id, "created new gist");
                self.notifier.info(&format!("Created new gist {id}"));
                (id, true)
            }
        };

        let document = self
            .store
            .read_document(&id)
            .await
            .map_err(|source| Error::RemoteReadFailed {
                id: id.clone(),
                source,
            })?;

        if let (Some(owner), Some(identity)) = (&document.owner, &self.ctx.identity) {
            if owner.trim() != identity.trim() {
                return Err(Error::OwnershipMismatch {
                    owner: owner.clone(),
                    identity: identity.clone(),
                });
            }
        }

        let files: BTreeMap<String, String> = upload_set
            .iter()
            .map(|f| (f.remote_key.clone(), f.content.clone()))
            .collect();
        self.store
            .write_document(&id, &files)
            .await
            .map_err(|source| Error::RemoteWriteFailed {
                id: id.clone(),
                source,
            })?;

        info!(id = %id, files = files.len(), "uploaded settings");
        self.notifier.info("Settings uploaded");

        Ok(UploadResponse {
            document_id: id,
            created,
            public: options.public || document.public,
            files: upload_set,
            uploaded_at: now,
        })
    }
}
