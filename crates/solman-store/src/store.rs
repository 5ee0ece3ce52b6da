use crate::lock::StoreLock;
use crate::{fsync_dir, StoreError};
use solman_schema::SolutionsConfig;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Conventional location of the node's SolutionsConfiguration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/metalk8s/solutions.yaml";

/// Durable store for the node's declared Solutions state.
///
/// Holds only the config path. Every operation re-reads the file from disk
/// and every save is a whole-file atomic replacement, so callers always see
/// the persisted truth and never a partial write.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted at [`DEFAULT_CONFIG_PATH`].
    pub fn at_default_path() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock file guarding mutations, next to the config file.
    pub fn lock_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(".lock");
        PathBuf::from(path)
    }

    /// Read and validate the configuration file.
    ///
    /// When the file is absent and `create` is true, a default empty document
    /// is materialized on disk and returned; when `create` is false, absence
    /// is [`StoreError::NotFound`].
    pub fn load(&self, create: bool) -> Result<SolutionsConfig, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                if create {
                    return self.create_default();
                }
                return Err(StoreError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        SolutionsConfig::parse(&raw).map_err(|source| StoreError::Schema {
            path: self.path.clone(),
            source,
        })
    }

    fn create_default(&self) -> Result<SolutionsConfig, StoreError> {
        info!(
            "creating default solutions configuration at {}",
            self.path.display()
        );
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let config = SolutionsConfig::default();
        self.save(&config)?;
        Ok(config)
    }

    /// Serialize and write the full configuration, replacing prior contents.
    pub fn save(&self, config: &SolutionsConfig) -> Result<(), StoreError> {
        let content = config.to_yaml().map_err(|source| StoreError::Schema {
            path: self.path.clone(),
            source,
        })?;

        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        fsync_dir(dir).map_err(write_err)?;

        Ok(())
    }

    /// Apply a mutation as one lock-load-mutate-save unit.
    ///
    /// The store lock is held across the whole pair, so concurrent callers
    /// on the same node cannot clobber each other's read-modify-write.
    pub fn update<F>(&self, create: bool, mutate: F) -> Result<SolutionsConfig, StoreError>
    where
        F: FnOnce(&mut SolutionsConfig),
    {
        let _lock = StoreLock::acquire(&self.lock_path())?;
        let mut config = self.load(create)?;
        mutate(&mut config);
        self.save(&config)?;
        Ok(config)
    }

    /// Register a Solution archive path. Idempotent: succeeds without change
    /// when the path is already present.
    pub fn add_archive(&self, archive: impl Into<PathBuf>, create: bool) -> Result<(), StoreError> {
        let archive = archive.into();
        debug!("registering solution archive {}", archive.display());
        self.update(create, |config| {
            config.add_archive(archive);
        })?;
        Ok(())
    }

    /// Drop a Solution archive path. Succeeds even when the path was not
    /// registered.
    pub fn remove_archive(&self, archive: &Path) -> Result<(), StoreError> {
        debug!("unregistering solution archive {}", archive.display());
        self.update(false, |config| {
            config.remove_archive(archive);
        })?;
        Ok(())
    }
}
