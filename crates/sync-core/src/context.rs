//! Immutable inputs shared by one upload or download.

use std::path::Path;

use sync_fs::{NormalizedPath, OsType, UserFile, io};

use crate::{Error, Result};

/// Identifier of this tool when it runs as an editor extension.
///
/// Never scheduled for removal by the extension differ.
pub const SELF_EXTENSION_ID: &str = "settings-sync.settings-sync";

/// Where the editor keeps its files on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Configuration root (the editor's `User` folder)
    pub user_folder: NormalizedPath,
    /// Folder holding installed extensions
    pub extensions_dir: NormalizedPath,
    /// Operating system the operation runs on
    pub os: OsType,
}

impl Environment {
    pub fn new(user_folder: impl Into<NormalizedPath>, extensions_dir: impl Into<NormalizedPath>, os: OsType) -> Self {
        Self {
            user_folder: user_folder.into(),
            extensions_dir: extensions_dir.into(),
            os,
        }
    }

    /// Resolve the editor folders, preferring explicit overrides.
    ///
    /// Defaults to `Code/User` under the platform config directory and
    /// `.vscode/extensions` under the home directory. Folders that already
    /// exist are canonicalized so remote keys never carry `..` or symlinks.
    pub fn detect(user_dir: Option<&Path>, extensions_dir: Option<&Path>) -> Result<Self> {
        let user_folder = match user_dir {
            Some(dir) => NormalizedPath::new(dir),
            None => {
                let base = dirs::config_dir().ok_or_else(|| Error::Environment {
                    message: "cannot determine the platform config directory".into(),
                })?;
                NormalizedPath::new(base.join("Code").join("User"))
            }
        };

        let extensions_dir = match extensions_dir {
            Some(dir) => NormalizedPath::new(dir),
            None => {
                let home = dirs::home_dir().ok_or_else(|| Error::Environment {
                    message: "cannot determine the home directory".into(),
                })?;
                NormalizedPath::new(home.join(".vscode").join("extensions"))
            }
        };

        Ok(Self::new(
            resolve_dir(user_folder)?,
            resolve_dir(extensions_dir)?,
            OsType::current(),
        ))
    }

    /// Path of a well-known file inside the configuration root.
    pub fn file(&self, file: UserFile) -> NormalizedPath {
        self.user_folder.join(file.as_str())
    }

    /// Path of the sync descriptor.
    pub fn descriptor_path(&self) -> NormalizedPath {
        self.file(UserFile::Descriptor)
    }

    /// Remote key this machine uses for its keybindings.
    pub fn keybinding_key(&self) -> UserFile {
        if self.os.is_mac() {
            UserFile::KeybindingsMac
        } else {
            UserFile::Keybindings
        }
    }
}

fn resolve_dir(dir: NormalizedPath) -> Result<NormalizedPath> {
    if dir.is_dir() {
        Ok(io::canonical_dir(&dir)?)
    } else {
        Ok(dir)
    }
}

/// Everything an operation needs to know about who and where it runs.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub env: Environment,
    /// Login of the authenticated remote user, when known
    pub identity: Option<String>,
    /// Host name used by `host=` settings annotations
    pub host_name: Option<String>,
    /// This tool's own extension identifier
    pub self_extension_id: String,
}

impl SyncContext {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            identity: None,
            host_name: None,
            self_extension_id: SELF_EXTENSION_ID.to_string(),
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_host_name(mut self, host_name: Option<String>) -> Self {
        self.host_name = host_name;
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.env.user_folder
    }

    pub fn os(&self) -> OsType {
        self.env.os
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keybinding_key_follows_os() {
        let mac = Environment::new("/u", "/e", OsType::Mac);
        let linux = Environment::new("/u", "/e", OsType::Linux);
        assert_eq!(mac.keybinding_key(), UserFile::KeybindingsMac);
        assert_eq!(linux.keybinding_key(), UserFile::Keybindings);
    }

    #[test]
    fn detect_honors_overrides() {
        let env = Environment::detect(
            Some(Path::new("/nonexistent/user")),
            Some(Path::new("/nonexistent/ext")),
        )
        .unwrap();
        assert_eq!(env.user_folder.as_str(), "/nonexistent/user");
        assert_eq!(
            env.descriptor_path().as_str(),
            "/nonexistent/user/syncLocalSettings.json"
        );
    }

    #[test]
    fn detect_canonicalizes_existing_folders() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("User")).unwrap();
        std::fs::create_dir_all(temp.path().join("ext")).unwrap();

        let dotted = temp.path().join("ext").join("..").join("User");
        let env = Environment::detect(Some(&dotted), Some(&temp.path().join("ext"))).unwrap();

        assert!(!env.user_folder.as_str().contains(".."), "got {}", env.user_folder);
        assert_eq!(env.user_folder.file_name(), Some("User"));
        assert!(env.user_folder.is_dir());
    }
}
