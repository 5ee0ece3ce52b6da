use crate::StoreError;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// Exclusive advisory lock serializing mutations of the configuration file.
///
/// Held for the duration of one load-mutate-save unit; released on drop.
pub struct StoreLock {
    lock_file: File,
}

impl StoreLock {
    pub fn acquire(lock_path: &Path) -> Result<Self, StoreError> {
        let lock_err = |source| StoreError::Lock {
            path: lock_path.to_owned(),
            source,
        };

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(lock_err)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(lock_path)
            .map_err(lock_err)?;

        file.lock_exclusive().map_err(lock_err)?;

        Ok(Self { lock_file: file })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.lock_file.unlock();
    }
}
