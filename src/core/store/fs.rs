//! Filesystem-backed document storage with atomic replacement.
//!
//! Writes are staged in a temporary file in the destination directory,
//! flushed to disk, then renamed over the destination. A crash at any point
//! leaves either the old document or the new one, never a truncated file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::Store;
use crate::core::constants::{FILE_MODE, TEMP_PREFIX, TEMP_SUFFIX};
use crate::error::{Result, StoreError};

/// A document stored in a single file.
#[derive(Debug, Clone)]
pub struct Filesystem {
    path: PathBuf,
}

impl Filesystem {
    /// Store backed by `path`, written with mode 0600.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for Filesystem {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::ReadFailed {
                path: self.location(),
                source,
            }
            .into()),
        }
    }

    fn write(&self, contents: &str) -> Result<()> {
        write_atomic(&self.path, contents.as_bytes(), FILE_MODE)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// A fully written and flushed temporary file waiting to replace its target.
///
/// Dropping a `Staged` without calling [`Staged::commit`] removes the
/// temporary file and leaves the target untouched.
#[derive(Debug)]
pub struct Staged {
    file: NamedTempFile,
    target: PathBuf,
}

impl Staged {
    /// Path of the temporary file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Atomically rename the staged file over its target.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the rename fails; the temporary
    /// file is removed and the target keeps its previous contents.
    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.file.persist(&target).map_err(|e| StoreError::WriteFailed {
            path: target.display().to_string(),
            source: e.error,
        })?;

        sync_parent(&target);
        debug!(path = %target.display(), "committed");
        Ok(())
    }
}

/// Write `bytes` to a temporary file next to `path` and flush it.
///
/// Parent directories are created if needed. The temporary file gets `mode`
/// before any data is written to it.
///
/// # Errors
///
/// Returns `StoreError::WriteFailed` on any I/O failure. Nothing is left
/// behind in that case.
pub fn stage(path: &Path, bytes: &[u8], mode: u32) -> Result<Staged> {
    let write_failed = |source: io::Error| StoreError::WriteFailed {
        path: path.display().to_string(),
        source,
    };

    let dir = parent_dir(path);
    fs::create_dir_all(&dir).map_err(write_failed)?;

    let mut file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(&dir)
        .map_err(write_failed)?;

    set_mode(file.as_file(), mode).map_err(write_failed)?;
    file.write_all(bytes).map_err(write_failed)?;
    file.as_file().sync_all().map_err(write_failed)?;

    debug!(path = %path.display(), bytes = bytes.len(), "staged");

    Ok(Staged {
        file,
        target: path.to_path_buf(),
    })
}

/// Atomically replace `path` with `bytes`.
///
/// # Errors
///
/// Returns `StoreError::WriteFailed` if staging or the final rename fails.
pub fn write_atomic(path: &Path, bytes: &[u8], mode: u32) -> Result<()> {
    stage(path, bytes, mode)?.commit()
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(unix)]
fn set_mode(file: &fs::File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_file: &fs::File, _mode: u32) -> io::Result<()> {
    Ok(())
}

// Persist the rename itself. Not every platform can open a directory.
#[cfg(unix)]
fn sync_parent(path: &Path) {
    if let Ok(dir) = fs::File::open(parent_dir(path)) {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) {}
