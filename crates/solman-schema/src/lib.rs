//! Wire types and validation for the Solutions registry.
//!
//! This crate defines the schema layer: the persisted `SolutionsConfiguration`
//! document ([`SolutionsConfig`]), the per-archive resolved manifest
//! ([`SolutionManifest`]) with its `config.yaml` overlay merge, and the
//! identifier newtypes shared across the workspace.

pub mod config;
pub mod manifest;
pub mod types;

pub use config::{SolutionsConfig, CONFIG_KIND, SUPPORTED_API_VERSIONS};
pub use manifest::{
    ImageSpec, ManifestOverlay, OperatorSpec, SolutionManifest, UiSpec, MANIFEST_API_VERSIONS,
    MANIFEST_KIND,
};
pub use types::{SolutionId, SolutionName, VersionSelector};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid `kind` ({found}), must be \"{expected}\"")]
    InvalidKind {
        found: String,
        expected: &'static str,
    },
    #[error("invalid `apiVersion` ({found}), must be one of: {}", .supported.join(", "))]
    UnsupportedApiVersion {
        found: String,
        supported: &'static [&'static str],
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_kind_names_offender_and_accepted_value() {
        let e = SchemaError::InvalidKind {
            found: "Nonsense".to_owned(),
            expected: CONFIG_KIND,
        };
        let msg = e.to_string();
        assert!(msg.contains("Nonsense"));
        assert!(msg.contains("SolutionsConfiguration"));
    }

    #[test]
    fn unsupported_api_version_lists_accepted_set() {
        let e = SchemaError::UnsupportedApiVersion {
            found: "v0".to_owned(),
            supported: SUPPORTED_API_VERSIONS,
        };
        let msg = e.to_string();
        assert!(msg.contains("v0"));
        assert!(msg.contains("solutions.metalk8s.scality.com/v1alpha1"));
    }
}
