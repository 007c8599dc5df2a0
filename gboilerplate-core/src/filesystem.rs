use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;

use crate::error::{Error, Result};

/// True if anything (file, directory or symlink, even a dangling one) sits at `path`.
pub fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Remove `path` and everything below it.
///
/// The walk uses an explicit stack so deep trees cannot exhaust the call stack.
/// Symlinks are unlinked, never followed. The first entry that cannot be removed
/// aborts the removal and is named in the returned error.
pub fn remove_tree(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| Error::remove(path, e))?;
    if !metadata.is_dir() {
        return remove_file(path);
    }

    let mut pending: Vec<PathBuf> = vec![path.to_path_buf()];
    let mut directories: Vec<PathBuf> = Vec::new();
    let mut files = 0usize;

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).map_err(|e| Error::remove(&dir, e))? {
            let entry = entry.map_err(|e| Error::remove(&dir, e))?;
            let entry_path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| Error::remove(&entry_path, e))?;

            if file_type.is_dir() {
                pending.push(entry_path);
            } else {
                remove_file(&entry_path)?;
                files += 1;
            }
        }
        directories.push(dir);
    }

    // A directory is always recorded after its parent, so reverse order empties children first.
    let dir_count = directories.len();
    for dir in directories.into_iter().rev() {
        fs::remove_dir(&dir).map_err(|e| Error::remove(&dir, e))?;
    }

    debug!(
        "Removed {} ({} files, {} directories)",
        path.display(),
        files,
        dir_count
    );
    Ok(())
}

fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        #[cfg(windows)]
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            // git marks object files read-only
            let mut permissions = fs::metadata(path)
                .map_err(|e| Error::remove(path, e))?
                .permissions();
            permissions.set_readonly(false);
            fs::set_permissions(path, permissions).map_err(|e| Error::remove(path, e))?;
            fs::remove_file(path).map_err(|e| Error::remove(path, e))
        }
        Err(e) => Err(Error::remove(path, e)),
    }
}
