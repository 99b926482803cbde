//! Manager image version verification

use crate::error::{Error, Result};
use crate::reference::ImageReference;
use crate::scanner::{container_paths, containers};
use modpack_core::manifest::{read_documents, ManifestDocument};
use modpack_core::types::Manager;
use modpack_core::ModuleConfig;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Checks that the manager workload runs the declared module version
#[derive(Debug, Default, Clone)]
pub struct ImageVersionVerifier;

impl ImageVersionVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Verify the rendered manifest at `manifest_path` against `config`.
    ///
    /// Does nothing when the module declares no manager.
    pub fn verify(&self, config: &ModuleConfig, manifest_path: &Path) -> Result<()> {
        let Some(manager) = &config.manager else {
            debug!("No manager declared, skipping image version verification");
            return Ok(());
        };

        let documents = read_documents(manifest_path)?;
        self.verify_documents(manager, &config.version, &documents)
    }

    /// Verify already parsed manifest documents.
    ///
    /// Succeeds as soon as one container of the manager workload carries the
    /// version as its tag. Containers without a usable tag are skipped; they
    /// only fail the check when no container had a tag at all.
    pub fn verify_documents(
        &self,
        manager: &Manager,
        version: &str,
        documents: &[ManifestDocument],
    ) -> Result<()> {
        let kind = manager.gvk.kind.as_str();
        let mut found = Vec::new();
        let mut first_invalid = None;

        let workloads = documents.iter().filter(|doc| {
            container_paths(kind).is_some()
                && doc.kind() == Some(kind)
                && doc.name() == Some(manager.name.as_str())
        });

        for workload in workloads {
            for container in containers(workload) {
                let Some(image) = container.get("image").and_then(Value::as_str) else {
                    continue;
                };

                let tag = match ImageReference::parse(image) {
                    Ok(ImageReference { tag: Some(tag), .. }) => tag,
                    Ok(_) => {
                        debug!("Skipping untagged manager image {}", image);
                        first_invalid.get_or_insert_with(|| {
                            Error::invalid_image_reference(image, "image has no tag")
                        });
                        continue;
                    }
                    Err(e) => {
                        debug!("Skipping unparseable manager image {}: {}", image, e);
                        first_invalid.get_or_insert_with(|| {
                            Error::invalid_image_reference(image, e.to_string())
                        });
                        continue;
                    }
                };

                if tag == version {
                    info!("Manager {} '{}' runs version {}", kind, manager.name, version);
                    return Ok(());
                }
                found.push(tag);
            }
        }

        if found.is_empty() {
            if let Some(err) = first_invalid {
                return Err(err);
            }
        }

        Err(Error::NoMatchedVersion {
            kind: kind.to_string(),
            manager: manager.name.clone(),
            expected: version.to_string(),
            found,
        })
    }
}
