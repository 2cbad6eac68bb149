//! Normalized path handling and remote-key flattening

use std::path::{Path, PathBuf};

use crate::constants::KEY_DELIMITER;

/// A path normalized to use forward slashes internally.
///
/// All paths are stored with forward slashes and converted to the
/// platform-native form only at I/O boundaries, so remote keys computed on
/// Windows and Unix agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    ///
    /// A leading dot (`.htmlhintrc`) does not start an extension.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Flatten this path into a remote key relative to `root`.
    ///
    /// `root/a/b.json` becomes `a|b.json`. Returns `None` when the path does
    /// not live under `root`.
    pub fn remote_key(&self, root: &NormalizedPath) -> Option<String> {
        let base = root.as_str().trim_end_matches('/');
        let rest = self.inner.strip_prefix(base)?.strip_prefix('/')?;
        if rest.is_empty() {
            return None;
        }
        Some(
            rest.split('/')
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(&KEY_DELIMITER.to_string()),
        )
    }

    /// Rebuild the local path for a flattened remote key under `root`.
    ///
    /// Returns `None` for keys with empty, `.` or `..` segments so a remote
    /// document can never address a path outside `root`.
    pub fn from_remote_key(root: &NormalizedPath, key: &str) -> Option<Self> {
        let segments: Vec<&str> = key.split(KEY_DELIMITER).collect();
        let valid = segments
            .iter()
            .all(|s| !s.is_empty() && *s != "." && *s != ".." && !s.contains(['/', '\\']));
        if !valid {
            return None;
        }
        Some(root.join(&segments.join("/")))
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
