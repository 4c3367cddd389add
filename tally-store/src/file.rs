//! Directory-rooted [`Storage`] with atomic writes.
//!
//! ## `write` — 4-step protocol
//!
//! 1. Ensure the root directory exists (mode `0700`).
//! 2. Write the bytes to `<name>.tmp` next to the target.
//! 3. `chmod 0600` the tmp file.
//! 4. Rename over the target (atomic on POSIX). On failure the tmp file
//!    is removed and the previous document stays intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tally_core::error::io_err;
use tally_core::{PersistError, Storage};

use crate::error::StoreError;

/// [`Storage`] that maps each name to a file under `root`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as-is; it is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create `root` (mode `0700`) if needed and return a storage over it.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let storage = Self::new(root);
        if storage.root.exists() && !storage.root.is_dir() {
            return Err(StoreError::NotADirectory(storage.root));
        }
        storage.ensure_root()?;
        Ok(storage)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<name>`; pure, no I/O.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn ensure_root(&self) -> Result<(), PersistError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| io_err(&self.root, e))?;
            set_dir_permissions(&self.root)?;
        }
        Ok(())
    }
}

impl Storage for FileStorage {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, PersistError> {
        let path = self.path_of(name);
        match std::fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), bytes = bytes.len(), "read");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(path, e)),
        }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), PersistError> {
        self.ensure_root()?;
        let path = self.path_of(name);
        let tmp = self.path_of(&format!("{name}.tmp"));

        std::fs::write(&tmp, bytes).map_err(|e| io_err(&tmp, e))?;
        set_file_permissions(&tmp)?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(path, e));
        }

        tracing::info!("wrote: {}", path.display());
        Ok(())
    }
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), PersistError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), PersistError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), PersistError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), PersistError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
