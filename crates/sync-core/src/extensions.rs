//! Extension list diffing and the editor extension host.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sync_fs::{NormalizedPath, UserFile, io};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::context::SyncContext;
use crate::settings::IgnoreRules;
use crate::{Error, Result};

/// One installed (or to be installed) editor extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRecord {
    /// `publisher.name`
    pub identifier: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub version: String,
}

impl ExtensionRecord {
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let publisher = identifier.split('.').next().unwrap_or_default().to_string();
        Self {
            display_name: identifier.clone(),
            identifier,
            publisher,
            version: String::new(),
        }
    }

    fn key(&self) -> String {
        self.identifier.to_lowercase()
    }
}

/// Extensions to install and remove to match a remote list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionDiff {
    pub to_add: Vec<ExtensionRecord>,
    pub to_remove: Vec<ExtensionRecord>,
}

impl ExtensionDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes which extensions to install and which to remove.
#[derive(Debug, Clone)]
pub struct ExtensionDiffer {
    self_identifier: String,
}

impl ExtensionDiffer {
    /// `self_identifier` is never scheduled for removal.
    pub fn new(self_identifier: impl Into<String>) -> Self {
        Self {
            self_identifier: self_identifier.into().to_lowercase(),
        }
    }

    /// Compare the remote list with what is installed.
    ///
    /// Identifiers compare case-insensitively. `to_add` keeps remote order,
    /// `to_remove` keeps installed order and stays empty unless
    /// `removal_enabled`.
    pub fn diff(
        &self,
        remote: &[ExtensionRecord],
        installed: &[ExtensionRecord],
        ignored: &IgnoreRules,
        removal_enabled: bool,
    ) -> ExtensionDiff {
        let installed_ids: BTreeSet<String> = installed.iter().map(ExtensionRecord::key).collect();
        let remote_ids: BTreeSet<String> = remote.iter().map(ExtensionRecord::key).collect();

        let to_add = remote
            .iter()
            .filter(|ext| !installed_ids.contains(&ext.key()))
            .filter(|ext| !ignored.excludes_extension(&ext.identifier))
            .cloned()
            .collect();

        let to_remove = if removal_enabled {
            installed
                .iter()
                .filter(|ext| ext.key() != self.self_identifier)
                .filter(|ext| !remote_ids.contains(&ext.key()))
                .filter(|ext| !ignored.excludes_extension(&ext.identifier))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        ExtensionDiff { to_add, to_remove }
    }
}

/// The editor side of extension management.
#[async_trait]
pub trait ExtensionHost: Send + Sync {
    /// List installed extensions.
    async fn installed(&self) -> Result<Vec<ExtensionRecord>>;

    async fn install(&self, extension: &ExtensionRecord) -> Result<()>;

    async fn uninstall(&self, extension: &ExtensionRecord) -> Result<()>;
}

/// Extension host backed by the extensions folder and the editor CLI.
#[derive(Debug, Clone)]
pub struct CodeExtensionHost {
    extensions_dir: NormalizedPath,
    code_binary: String,
}

impl CodeExtensionHost {
    pub fn new(extensions_dir: NormalizedPath, code_binary: impl Into<String>) -> Self {
        Self {
            extensions_dir,
            code_binary: code_binary.into(),
        }
    }

    async fn run(&self, flag: &str, extension: &ExtensionRecord) -> Result<()> {
        debug!(binary = %self.code_binary, flag, id = %extension.identifier, "running editor CLI");
        let output = Command::new(&self.code_binary)
            .arg(flag)
            .arg(&extension.identifier)
            .output()
            .await
            .map_err(|e| Error::ExtensionHost {
                message: format!("failed to run '{}': {}", self.code_binary, e),
            })?;

        if !output.status.success() {
            return Err(Error::ExtensionHost {
                message: format!(
                    "'{} {} {}' failed: {}",
                    self.code_binary,
                    flag,
                    extension.identifier,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ExtensionHost for CodeExtensionHost {
    async fn installed(&self) -> Result<Vec<ExtensionRecord>> {
        let dir = self.extensions_dir.clone();
        tokio::task::spawn_blocking(move || scan_extensions_dir(&dir))
            .await
            .map_err(|e| Error::ExtensionHost {
                message: format!("extension scan task failed: {e}"),
            })?
    }

    async fn install(&self, extension: &ExtensionRecord) -> Result<()> {
        self.run("--install-extension", extension).await
    }

    async fn uninstall(&self, extension: &ExtensionRecord) -> Result<()> {
        self.run("--uninstall-extension", extension).await
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    name: String,
    publisher: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Read every `<dir>/*/package.json` into extension records.
///
/// A missing folder means nothing is installed. Folders without a readable
/// manifest are skipped.
pub fn scan_extensions_dir(dir: &NormalizedPath) -> Result<Vec<ExtensionRecord>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for entry in io::read_dir_sorted(dir)? {
        if !entry.is_dir() {
            continue;
        }
        let Some(content) = io::read_text_if_exists(&entry.join("package.json"))? else {
            continue;
        };
        let manifest: PackageManifest = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %entry, error = %e, "skipping extension with unreadable manifest");
                continue;
            }
        };
        let identifier = format!("{}.{}", manifest.publisher, manifest.name);
        records.push(ExtensionRecord {
            display_name: manifest.display_name.unwrap_or_else(|| identifier.clone()),
            identifier,
            publisher: manifest.publisher,
            version: manifest.version,
        });
    }
    Ok(records)
}

/// Write the installed extension list to `extensions.json` in the root.
///
/// Ignored extensions and this tool itself are left out. Returns the number
/// of extensions written.
pub async fn write_extension_list(
    ctx: &SyncContext,
    host: &dyn ExtensionHost,
    ignored: &IgnoreRules,
) -> Result<usize> {
    let self_id = ctx.self_extension_id.to_lowercase();
    let extensions: Vec<ExtensionRecord> = host
        .installed()
        .await?
        .into_iter()
        .filter(|ext| ext.key() != self_id && !ignored.excludes_extension(&ext.identifier))
        .collect();

    let content = serde_json::to_string_pretty(&extensions)?;
    io::write_text(&ctx.env.file(UserFile::Extensions), &content)?;
    info!(count = extensions.len(), "wrote extension list");
    Ok(extensions.len())
}
