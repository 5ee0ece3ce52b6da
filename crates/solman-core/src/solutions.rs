use crate::mounts::{ArchiveInspector, MountEnumerator, MountRules};
use crate::resolver::read_solution_config;
use crate::CoreError;
use serde::Serialize;
use solman_schema::{SolutionId, SolutionManifest, SolutionName, VersionSelector};
use solman_store::ConfigStore;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// One mounted, activatable version of a Solution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionInstance {
    /// Name as published by the archive, before normalization.
    pub display_name: String,
    pub id: SolutionId,
    pub mountpoint: PathBuf,
    /// Device or backing file the archive is mounted from.
    pub archive: PathBuf,
    pub version: String,
    pub manifest: SolutionManifest,
}

/// Registry and activation manager for the node's Solutions.
///
/// Composes the configuration store with the injected mount enumerator and
/// archive inspector. Holds no state between calls: availability is derived
/// from the live mount table and the configuration file is re-read on every
/// operation.
pub struct Solutions {
    store: ConfigStore,
    mounts: Box<dyn MountEnumerator>,
    inspector: Box<dyn ArchiveInspector>,
    rules: MountRules,
}

impl Solutions {
    pub fn new(
        store: ConfigStore,
        mounts: Box<dyn MountEnumerator>,
        inspector: Box<dyn ArchiveInspector>,
    ) -> Self {
        Self {
            store,
            mounts,
            inspector,
            rules: MountRules::default(),
        }
    }

    /// Replace the default mount classification rules.
    pub fn with_rules(mut self, rules: MountRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Group every mounted Solution archive by normalized name.
    ///
    /// This is the source of truth for what can be activated.
    pub fn list_available(
        &self,
    ) -> Result<BTreeMap<SolutionName, Vec<SolutionInstance>>, CoreError> {
        let mounts = self.mounts.active_mounts()?;
        let mut available: BTreeMap<SolutionName, Vec<SolutionInstance>> = BTreeMap::new();

        for (mountpoint, mount_info) in self.rules.solution_mounts(&mounts) {
            let archive_info = self.inspector.archive_info(mountpoint)?;
            let name = SolutionName::normalized(&archive_info.name);
            let version = archive_info.version;
            let manifest = read_solution_config(mountpoint, &name, &version)?;
            debug!(
                "found solution {name} version {version} at {}",
                mountpoint.display()
            );

            available.entry(name.clone()).or_default().push(SolutionInstance {
                display_name: archive_info.name,
                id: SolutionId::for_version(&name, &version),
                mountpoint: mountpoint.clone(),
                archive: mount_info.source_device.clone(),
                version,
                manifest,
            });
        }

        Ok(available)
    }

    /// Record `selector` as the active version of the named Solution.
    ///
    /// The configuration file is never created here: activation implies
    /// archives were already registered, so an absent file surfaces as
    /// [`solman_store::StoreError::NotFound`] instead of being masked.
    pub fn activate(&self, name: &str, selector: VersionSelector) -> Result<(), CoreError> {
        let name = SolutionName::normalized(name);
        info!("activating solution {name} at version {selector}");

        let available = self.list_available()?;
        let Some(instances) = available.get(&name) else {
            return Err(CoreError::SolutionNotAvailable {
                name: name.to_string(),
            });
        };

        if let VersionSelector::Exact(version) = &selector {
            if !instances.iter().any(|instance| instance.version == *version) {
                return Err(CoreError::VersionNotAvailable {
                    name: name.to_string(),
                    version: version.clone(),
                });
            }
        }

        self.store.update(false, |config| {
            config.active.insert(name, selector);
        })?;
        Ok(())
    }

    /// Drop the named Solution from the active map. Succeeds even when it
    /// was not active.
    pub fn deactivate(&self, name: &str) -> Result<(), CoreError> {
        let name = SolutionName::normalized(name);
        info!("deactivating solution {name}");

        self.store.update(false, |config| {
            config.active.remove(&name);
        })?;
        Ok(())
    }
}
