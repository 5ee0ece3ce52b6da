use crate::CoreError;
use solman_schema::{ManifestOverlay, SolutionManifest, SolutionName};
use std::fs;
use std::path::Path;
use tracing::debug;

const IMAGES_DIR: &str = "images";
const MANIFEST_FILE: &str = "config.yaml";

/// Enumerate the `name:version` images shipped in a mounted archive.
///
/// Each immediate child directory of `images/` is an image name; each
/// directory below it is a version of that image. An archive without an
/// `images/` directory is malformed.
pub fn list_solution_images(mountpoint: &Path) -> Result<Vec<String>, CoreError> {
    let images_dir = mountpoint.join(IMAGES_DIR);
    if !images_dir.is_dir() {
        return Err(CoreError::InvalidArchive {
            mountpoint: mountpoint.to_owned(),
            reason: format!(
                "{} does not exist or is not a directory",
                images_dir.display()
            ),
        });
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(&images_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let image_name = entry.file_name();
        let image_name = image_name.to_string_lossy();

        for version_entry in fs::read_dir(entry.path())? {
            let version_entry = version_entry?;
            if !version_entry.file_type()?.is_dir() {
                continue;
            }
            let version = version_entry.file_name();
            images.push(format!("{image_name}:{}", version.to_string_lossy()));
        }
    }
    images.sort();
    Ok(images)
}

/// Resolve the effective manifest for the archive mounted at `mountpoint`.
///
/// Starts from the computed defaults for `name`/`version`, then overlays the
/// archive's `config.yaml` when present. An absent `config.yaml` is the
/// common case, not an error.
pub fn read_solution_config(
    mountpoint: &Path,
    name: &SolutionName,
    version: &str,
) -> Result<SolutionManifest, CoreError> {
    debug!("reading solution config from {}", mountpoint.display());
    let images = list_solution_images(mountpoint)?;
    let mut manifest = SolutionManifest::defaults(name, version, images);

    let manifest_path = mountpoint.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        debug!(
            "solution mounted at {} has no {MANIFEST_FILE}",
            mountpoint.display()
        );
        return Ok(manifest);
    }

    let raw = fs::read_to_string(&manifest_path)?;
    let overlay = ManifestOverlay::parse(&raw)?;
    overlay.merge_into(&mut manifest);
    Ok(manifest)
}
