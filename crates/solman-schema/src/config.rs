use crate::types::{SolutionName, VersionSelector};
use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Discriminator `kind` every configuration document must carry.
pub const CONFIG_KIND: &str = "SolutionsConfiguration";

/// Accepted `apiVersion` values for the configuration document.
pub const SUPPORTED_API_VERSIONS: &[&str] = &["solutions.metalk8s.scality.com/v1alpha1"];

/// Persisted declaration of the node's Solutions state: registered archive
/// paths and the active version selector per solution.
///
/// `archives` and `active` default to empty containers when absent from a
/// loaded document, and unknown fields are tolerated, so older binaries can
/// read newer files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionsConfig {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub archives: Vec<PathBuf>,
    #[serde(default)]
    pub active: BTreeMap<SolutionName, VersionSelector>,
}

impl Default for SolutionsConfig {
    fn default() -> Self {
        Self {
            api_version: SUPPORTED_API_VERSIONS[0].to_owned(),
            kind: CONFIG_KIND.to_owned(),
            archives: Vec::new(),
            active: BTreeMap::new(),
        }
    }
}

impl SolutionsConfig {
    /// Parse and validate a configuration document.
    pub fn parse(input: &str) -> Result<Self, SchemaError> {
        let config: Self = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the schema discriminators. A mismatch is a hard failure, never
    /// silently corrected.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.kind != CONFIG_KIND {
            return Err(SchemaError::InvalidKind {
                found: self.kind.clone(),
                expected: CONFIG_KIND,
            });
        }
        if !SUPPORTED_API_VERSIONS.contains(&self.api_version.as_str()) {
            return Err(SchemaError::UnsupportedApiVersion {
                found: self.api_version.clone(),
                supported: SUPPORTED_API_VERSIONS,
            });
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, SchemaError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Register an archive path. No-op if already present; returns whether
    /// the sequence changed.
    pub fn add_archive(&mut self, archive: impl Into<PathBuf>) -> bool {
        let archive = archive.into();
        if self.archives.contains(&archive) {
            return false;
        }
        self.archives.push(archive);
        true
    }

    /// Drop an archive path. No-op if absent; returns whether the sequence
    /// changed.
    pub fn remove_archive(&mut self, archive: &Path) -> bool {
        let before = self.archives.len();
        self.archives.retain(|known| known != archive);
        self.archives.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let input = r"
apiVersion: solutions.metalk8s.scality.com/v1alpha1
kind: SolutionsConfiguration
archives:
  - /srv/downloads/example-solution-1.0.0.iso
active:
  example-solution: latest
  other-solution: 2.1.0
";
        let config = SolutionsConfig::parse(input).expect("should parse");
        assert_eq!(config.archives.len(), 1);
        assert_eq!(
            config.active.get(&SolutionName::from("example-solution")),
            Some(&VersionSelector::Latest)
        );
        assert_eq!(
            config.active.get(&SolutionName::from("other-solution")),
            Some(&VersionSelector::Exact("2.1.0".to_owned()))
        );
    }

    #[test]
    fn missing_containers_default_to_empty() {
        let input = r"
apiVersion: solutions.metalk8s.scality.com/v1alpha1
kind: SolutionsConfiguration
";
        let config = SolutionsConfig::parse(input).expect("should parse");
        assert!(config.archives.is_empty());
        assert!(config.active.is_empty());
    }

    #[test]
    fn tolerates_unknown_fields() {
        let input = r"
apiVersion: solutions.metalk8s.scality.com/v1alpha1
kind: SolutionsConfiguration
futureField: whatever
";
        assert!(SolutionsConfig::parse(input).is_ok());
    }

    #[test]
    fn rejects_wrong_kind() {
        let input = r"
apiVersion: solutions.metalk8s.scality.com/v1alpha1
kind: Something else
archives: []
active: {}
";
        match SolutionsConfig::parse(input) {
            Err(SchemaError::InvalidKind { found, .. }) => assert_eq!(found, "Something else"),
            other => panic!("expected InvalidKind, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_kind() {
        let input = "apiVersion: solutions.metalk8s.scality.com/v1alpha1\n";
        assert!(matches!(
            SolutionsConfig::parse(input),
            Err(SchemaError::InvalidKind { .. })
        ));
    }

    #[test]
    fn rejects_unsupported_api_version() {
        let input = r"
apiVersion: solutions.metalk8s.scality.com/v2
kind: SolutionsConfiguration
";
        match SolutionsConfig::parse(input) {
            Err(SchemaError::UnsupportedApiVersion { found, .. }) => {
                assert_eq!(found, "solutions.metalk8s.scality.com/v2");
            }
            other => panic!("expected UnsupportedApiVersion, got {other:?}"),
        }
    }

    #[test]
    fn default_document_is_valid_and_empty() {
        let config = SolutionsConfig::default();
        config.validate().unwrap();
        assert!(config.archives.is_empty());
        assert!(config.active.is_empty());
        assert_eq!(config.kind, CONFIG_KIND);
        assert_eq!(config.api_version, SUPPORTED_API_VERSIONS[0]);
    }

    #[test]
    fn add_archive_is_idempotent() {
        let mut config = SolutionsConfig::default();
        assert!(config.add_archive("/srv/downloads/solution.iso"));
        assert!(!config.add_archive("/srv/downloads/solution.iso"));
        assert_eq!(config.archives.len(), 1);
    }

    #[test]
    fn remove_archive_on_absent_path_is_a_noop() {
        let mut config = SolutionsConfig::default();
        config.add_archive("/srv/downloads/solution.iso");
        assert!(!config.remove_archive(Path::new("/srv/downloads/other.iso")));
        assert_eq!(config.archives.len(), 1);
        assert!(config.remove_archive(Path::new("/srv/downloads/solution.iso")));
        assert!(config.archives.is_empty());
    }

    #[test]
    fn yaml_roundtrip_is_stable() {
        let mut config = SolutionsConfig::default();
        config.add_archive("/srv/downloads/solution.iso");
        config
            .active
            .insert(SolutionName::from("example-solution"), VersionSelector::Latest);

        let first = config.to_yaml().unwrap();
        let reparsed = SolutionsConfig::parse(&first).unwrap();
        assert_eq!(reparsed, config);
        assert_eq!(reparsed.to_yaml().unwrap(), first);
    }
}
