//! Mount scanning, per-archive manifest resolution, and the Solutions
//! activation engine.
//!
//! This crate ties the schema and store layers together into [`Solutions`],
//! the registry API consumed by the orchestration agent: enumerate mounted
//! Solution archives, resolve each archive's effective manifest, and record
//! which version of which Solution is active. Availability is re-derived
//! from the live mount table on every call; nothing is cached.

pub mod mounts;
pub mod resolver;
pub mod solutions;

pub use mounts::{
    ArchiveInfo, ArchiveInspector, MountEnumerator, MountInfo, MountRules, ProcMounts,
    DEFAULT_ARCHIVE_FSTYPE, DEFAULT_PLATFORM_MOUNT_PREFIX, DEFAULT_SOLUTIONS_MOUNT_ROOT,
};
pub use resolver::{list_solution_images, read_solution_config};
pub use solutions::{SolutionInstance, Solutions};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("schema error: {0}")]
    Schema(#[from] solman_schema::SchemaError),
    #[error("store error: {0}")]
    Store(#[from] solman_store::StoreError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid solution archive at {}: {reason}", .mountpoint.display())]
    InvalidArchive { mountpoint: PathBuf, reason: String },
    #[error("cannot activate solution \"{name}\": not available")]
    SolutionNotAvailable { name: String },
    #[error("cannot activate version \"{version}\" for solution \"{name}\": not available")]
    VersionNotAvailable { name: String, version: String },
}
