//! Thin adapter over a directory walk: turns filesystem entries into scan
//! work items or error reports, per the `IS_REG`/`IS_DIR`/`IS_ERROR` policy.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// One event surfaced while walking a directory tree.
pub enum WalkEvent {
    /// A regular file to be enqueued for scanning.
    Regular(PathBuf),
    /// An I/O failure while walking; reported independently, never enqueued.
    Error { path: PathBuf, message: String },
}

/// Walks `root`, yielding one event per regular file or traversal error.
/// Directories and other entry kinds (symlinks, sockets, ...) are silently
/// skipped. `recurse` controls whether subdirectories are descended into;
/// when false only `root`'s immediate children are visited.
pub fn walk(root: &Path, recurse: bool) -> impl Iterator<Item = WalkEvent> {
    let max_depth = if recurse { usize::MAX } else { 1 };
    WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(WalkEvent::Regular(entry.into_path())),
            Ok(_) => None,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                Some(WalkEvent::Error {
                    path,
                    message: err.to_string(),
                })
            }
        })
}
