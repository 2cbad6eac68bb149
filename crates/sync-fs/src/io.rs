//! Atomic I/O operations with file locking

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so a reader never observes a partial file.
/// Every call gets its own temp file, removed if any step fails. Missing
/// parent directories are created.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();
    let parent = match native_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| Error::io(&parent, e))?;

    // Temp file lives next to the target so the rename stays on one filesystem
    let mut temp_file = NamedTempFile::new_in(&parent).map_err(|e| Error::io(&parent, e))?;

    temp_file
        .as_file()
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_file.path(), e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(temp_file.path(), e))?;

    temp_file.as_file().unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .persist(&native_path)
        .map_err(|e| Error::io(&native_path, e.error))?;
    debug!(path = %path, bytes = content.len(), "wrote file");

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content, mapping a missing file to `None`.
pub fn read_text_if_exists(path: &NormalizedPath) -> Result<Option<String>> {
    match read_text(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Create a directory and all of its missing parents.
pub fn create_dir_all(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// List the entries of a directory, sorted by path.
pub fn read_dir_sorted(path: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let native_path = path.to_native();
    let entries = fs::read_dir(&native_path).map_err(|e| Error::io(&native_path, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native_path, e))?;
        paths.push(NormalizedPath::new(entry.path()));
    }
    paths.sort();
    Ok(paths)
}

/// Resolve a directory to its canonical form without UNC prefixes on Windows.
pub fn canonical_dir(path: &NormalizedPath) -> Result<NormalizedPath> {
    let native_path = path.to_native();
    dunce::canonicalize(&native_path)
        .map(NormalizedPath::new)
        .map_err(|e| Error::io(&native_path, e))
}
