//! Local file collection.

use sync_fs::{NormalizedPath, io};
use tracing::debug;

use crate::file::FileRecord;
use crate::{Error, Result};

/// Default recursion bound for the configuration root.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Collect syncable files under `root`.
///
/// Subdirectories are entered only while `current_depth < max_depth`. A file
/// is kept when its lower-cased extension is in `allowed_extensions`, or it
/// has no extension and `""` is allowed. Remote keys are relative to `root`
/// with folders flattened by `|`. Results are sorted by path.
pub fn list_files(
    root: &NormalizedPath,
    current_depth: usize,
    max_depth: usize,
    allowed_extensions: &[String],
) -> Result<Vec<FileRecord>> {
    if !root.is_dir() {
        return Err(Error::NotFound {
            path: root.to_native(),
        });
    }

    let allowed: Vec<String> = allowed_extensions.iter().map(|e| e.to_lowercase()).collect();
    let mut files = Vec::new();
    walk(root, root, current_depth, max_depth, &allowed, &mut files)?;
    files.sort_by(|a, b| a.source_path.cmp(&b.source_path));
    debug!(root = %root, count = files.len(), "collected local files");
    Ok(files)
}

fn walk(
    root: &NormalizedPath,
    dir: &NormalizedPath,
    depth: usize,
    max_depth: usize,
    allowed: &[String],
    out: &mut Vec<FileRecord>,
) -> Result<()> {
    for entry in io::read_dir_sorted(dir)? {
        if entry.is_dir() {
            if depth < max_depth {
                walk(root, &entry, depth + 1, max_depth, allowed, out)?;
            }
            continue;
        }

        let extension = entry.extension().unwrap_or("").to_lowercase();
        if !allowed.contains(&extension) {
            continue;
        }

        let (Some(name), Some(key)) = (entry.file_name(), entry.remote_key(root)) else {
            continue;
        };
        let content = io::read_text(&entry)?;
        out.push(FileRecord::new(name, content, Some(entry.clone()), key));
    }
    Ok(())
}
