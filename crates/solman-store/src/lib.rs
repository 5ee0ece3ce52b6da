//! Durable store for the node's `SolutionsConfiguration` file.
//!
//! This crate provides the storage layer: [`ConfigStore`] loads and validates
//! the persisted document (optionally creating a default one), rewrites it
//! atomically on save, and serializes every read-modify-write sequence under
//! an advisory file lock ([`StoreLock`]).

pub mod lock;
pub mod store;

pub use lock::StoreLock;
pub use store::{ConfigStore, DEFAULT_CONFIG_PATH};

use solman_schema::SchemaError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fsync a directory to ensure that a preceding `rename()` is durable.
///
/// On Linux with ext4 `data=ordered` (the default), renames are usually
/// durable without an explicit dir fsync, but POSIX does not guarantee this.
/// Calling `fsync()` on the parent directory makes the rename durable on
/// all filesystems and mount configurations.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("solutions configuration not found at {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration in {}: {source}", .path.display())]
    Schema { path: PathBuf, source: SchemaError },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_path() {
        let e = StoreError::NotFound {
            path: PathBuf::from("/etc/metalk8s/solutions.yaml"),
        };
        assert!(e.to_string().contains("/etc/metalk8s/solutions.yaml"));
    }

    #[test]
    fn schema_error_carries_the_cause() {
        let cause = SchemaError::InvalidKind {
            found: "Bogus".to_owned(),
            expected: solman_schema::CONFIG_KIND,
        };
        let e = StoreError::Schema {
            path: PathBuf::from("/tmp/solutions.yaml"),
            source: cause,
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/solutions.yaml"));
        assert!(msg.contains("Bogus"));
    }
}
