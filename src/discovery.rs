//! Source file discovery.

use crate::error::{EtlError, EtlResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// Returns the absolute path of every file under `root` whose extension is
/// `extension`, at any depth.
///
/// Entries are visited in file-name order, so the result is stable for an
/// unchanged tree. Hidden files are skipped. An unreadable root or
/// subdirectory fails the whole discovery.
pub fn find_files<P: AsRef<Path>>(root: P, extension: &str) -> EtlResult<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(EtlError::RootNotFound(root.to_path_buf()));
    }
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|source| EtlError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        cwd.join(root)
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(|source| EtlError::Discovery {
            root: root.clone(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && !is_hidden(path)
            && path.extension().and_then(|e| e.to_str()) == Some(extension)
        {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
