use crate::types::SolutionName;
use crate::SchemaError;
use serde::{Deserialize, Serialize};

/// Discriminator `kind` for a per-archive `config.yaml` manifest.
pub const MANIFEST_KIND: &str = "SolutionConfig";

/// Accepted `apiVersion` values for a per-archive manifest.
pub const MANIFEST_API_VERSIONS: &[&str] = &["solutions.metalk8s.scality.com/v1alpha1"];

/// Resolved descriptor for one mounted solution version.
///
/// Built from computed defaults, then optionally overlaid with the archive's
/// `config.yaml` (see [`ManifestOverlay`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionManifest {
    pub api_version: String,
    pub kind: String,
    pub operator: OperatorSpec,
    pub ui: UiSpec,
    /// `name:version` pairs shipped in the archive's image tree.
    pub images: Vec<String>,
    pub custom_api_groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSpec {
    pub image: ImageSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSpec {
    pub image: ImageSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    pub name: String,
    pub tag: String,
}

impl SolutionManifest {
    /// Compute the default manifest for a solution version: operator and UI
    /// images derived from the solution name, tagged with the version.
    pub fn defaults(name: &SolutionName, version: &str, images: Vec<String>) -> Self {
        Self {
            api_version: MANIFEST_API_VERSIONS[0].to_owned(),
            kind: MANIFEST_KIND.to_owned(),
            operator: OperatorSpec {
                image: ImageSpec {
                    name: format!("{name}-operator"),
                    tag: version.to_owned(),
                },
            },
            ui: UiSpec {
                image: ImageSpec {
                    name: format!("{name}-ui"),
                    tag: version.to_owned(),
                },
            },
            images,
            custom_api_groups: Vec::new(),
        }
    }
}

/// Partial manifest parsed from an archive's `config.yaml`.
///
/// Every field is optional; [`merge_into`](Self::merge_into) overlays the
/// provided leaves onto a default manifest, leaving absent leaves untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestOverlay {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub operator: Option<OperatorOverlay>,
    #[serde(default)]
    pub ui: Option<UiOverlay>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub custom_api_groups: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperatorOverlay {
    #[serde(default)]
    pub image: Option<ImageOverlay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiOverlay {
    #[serde(default)]
    pub image: Option<ImageOverlay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageOverlay {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl ManifestOverlay {
    /// Parse a `config.yaml` document and validate its discriminators.
    pub fn parse(input: &str) -> Result<Self, SchemaError> {
        let overlay: Self = serde_yaml::from_str(input)?;
        overlay.validate()?;
        Ok(overlay)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        let kind = self.kind.as_deref().unwrap_or_default();
        if kind != MANIFEST_KIND {
            return Err(SchemaError::InvalidKind {
                found: kind.to_owned(),
                expected: MANIFEST_KIND,
            });
        }
        let api_version = self.api_version.as_deref().unwrap_or_default();
        if !MANIFEST_API_VERSIONS.contains(&api_version) {
            return Err(SchemaError::UnsupportedApiVersion {
                found: api_version.to_owned(),
                supported: MANIFEST_API_VERSIONS,
            });
        }
        Ok(())
    }

    /// Deep-merge the provided fields over `manifest`. Provided values win;
    /// unspecified nested fields keep their defaults. The manifest's own
    /// discriminators are left as-is.
    pub fn merge_into(self, manifest: &mut SolutionManifest) {
        if let Some(image) = self.operator.and_then(|operator| operator.image) {
            image.merge_into(&mut manifest.operator.image);
        }
        if let Some(image) = self.ui.and_then(|ui| ui.image) {
            image.merge_into(&mut manifest.ui.image);
        }
        if let Some(images) = self.images {
            manifest.images = images;
        }
        if let Some(groups) = self.custom_api_groups {
            manifest.custom_api_groups = groups;
        }
    }
}

impl ImageOverlay {
    fn merge_into(self, image: &mut ImageSpec) {
        if let Some(name) = self.name {
            image.name = name;
        }
        if let Some(tag) = self.tag {
            image.tag = tag;
        }
    }
}
