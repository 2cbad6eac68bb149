//! The sync descriptor and the tool configuration.
//!
//! The descriptor (`syncLocalSettings.json`) lives in the editor's user folder
//! and describes what to sync. The tool configuration (`config.toml`) lives in
//! the platform config directory and describes where and how.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sync_fs::{ConfigStore, NormalizedPath};
use tracing::debug;

use crate::context::Environment;
use crate::{Error, Result};

/// Default description given to newly created gists.
pub const DEFAULT_GIST_DESCRIPTION: &str = "Visual Studio Code Settings Sync Gist";

/// Local descriptor of what to sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSettings {
    /// Exact file names never uploaded
    pub ignore_upload_files: Vec<String>,
    /// Path substrings that exclude a file from upload
    pub ignore_upload_folders: Vec<String>,
    /// Extension identifiers never uploaded, installed or removed
    pub ignore_extensions: Vec<String>,
    /// Logical name to out-of-tree path
    pub custom_files: BTreeMap<String, PathBuf>,
    /// File extensions the collector picks up
    pub supported_file_extensions: Vec<String>,
    pub gist_description: String,
    /// Prompt for a description when a gist is created
    pub ask_gist_name: bool,
    pub host_name: Option<String>,
    pub last_upload: Option<DateTime<Utc>>,
    pub last_download: Option<DateTime<Utc>>,
}

impl Default for CustomSettings {
    fn default() -> Self {
        Self {
            ignore_upload_files: [
                "state.*",
                "syncLocalSettings.json",
                ".DS_Store",
                "sync.lock",
                "projects.json",
                "projects_cache_vscode.json",
                "projects_cache_git.json",
                "projects_cache_svn.json",
                "gpm_projects.json",
                "gpm-recentItems.json",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            ignore_upload_folders: vec!["workspaceStorage".into()],
            ignore_extensions: Vec::new(),
            custom_files: BTreeMap::new(),
            supported_file_extensions: vec!["json".into(), "code-snippets".into()],
            gist_description: DEFAULT_GIST_DESCRIPTION.into(),
            ask_gist_name: false,
            host_name: None,
            last_upload: None,
            last_download: None,
        }
    }
}

impl CustomSettings {
    /// Load the descriptor from the user folder.
    ///
    /// Returns `ConfigurationMissing` when the file does not exist.
    pub fn load(env: &Environment) -> Result<Self> {
        let path = env.descriptor_path();
        if !path.is_file() {
            return Err(Error::ConfigurationMissing {
                path: path.to_native(),
            });
        }
        Ok(ConfigStore::new().load(&path)?)
    }

    /// Load the descriptor, or defaults when it has not been created yet.
    pub fn load_or_default(env: &Environment) -> Result<Self> {
        Ok(ConfigStore::new().load_or_default(&env.descriptor_path())?)
    }

    pub fn save(&self, env: &Environment) -> Result<()> {
        let path = env.descriptor_path();
        debug!(path = %path, "saving sync descriptor");
        Ok(ConfigStore::new().save(&path, self)?)
    }

    pub fn ignore_rules(&self) -> IgnoreRules {
        IgnoreRules {
            ignored_file_names: self.ignore_upload_files.iter().cloned().collect(),
            ignored_folder_substrings: self.ignore_upload_folders.iter().cloned().collect(),
            ignored_extension_identifiers: self
                .ignore_extensions
                .iter()
                .map(|id| id.to_lowercase())
                .collect(),
        }
    }
}

/// Exclusions applied before upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    pub ignored_file_names: BTreeSet<String>,
    pub ignored_folder_substrings: BTreeSet<String>,
    /// Lower-cased extension identifiers
    pub ignored_extension_identifiers: BTreeSet<String>,
}

impl IgnoreRules {
    /// Whether a file with this name at this path stays local.
    pub fn excludes_file(&self, file_name: &str, path: &NormalizedPath) -> bool {
        self.ignored_file_names.contains(file_name)
            || self
                .ignored_folder_substrings
                .iter()
                .any(|folder| path.as_str().contains(folder.as_str()))
    }

    pub fn excludes_extension(&self, identifier: &str) -> bool {
        self.ignored_extension_identifiers
            .contains(&identifier.to_lowercase())
    }
}

/// Tool configuration read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Id of the gist holding the settings
    pub gist: Option<String>,
    /// Personal access token with gist scope
    pub token: Option<String>,
    /// API base URL of a GitHub Enterprise instance
    pub github_enterprise_url: Option<String>,
    pub public_gist: bool,
    pub sync_extensions: bool,
    pub remove_extensions: bool,
    pub force_download: bool,
    pub quiet_sync: bool,
    pub user_dir: Option<PathBuf>,
    pub extensions_dir: Option<PathBuf>,
    /// Editor executable used to install and uninstall extensions
    pub code_binary: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            gist: None,
            token: None,
            github_enterprise_url: None,
            public_gist: false,
            sync_extensions: true,
            remove_extensions: true,
            force_download: false,
            quiet_sync: false,
            user_dir: None,
            extensions_dir: None,
            code_binary: "code".into(),
        }
    }
}

impl SyncConfig {
    /// Default location: `<config dir>/settings-sync/config.toml`.
    pub fn default_path() -> Result<NormalizedPath> {
        let base = dirs::config_dir().ok_or_else(|| Error::Environment {
            message: "cannot determine the platform config directory".into(),
        })?;
        Ok(NormalizedPath::new(base.join("settings-sync").join("config.toml")))
    }

    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load_or_default(path)?)
    }

    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        Ok(ConfigStore::new().save(path, self)?)
    }

    /// The gist id, treating a blank value as unset.
    pub fn gist_id(&self) -> Option<&str> {
        self.gist.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}
