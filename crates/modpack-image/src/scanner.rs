//! Discovery of container images in raw manifests

use crate::error::Result;
use crate::reference::ImageReference;
use modpack_core::manifest::ManifestDocument;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, trace};

const POD_CONTAINERS: &[&str] = &["spec", "template", "spec", "containers"];
const POD_INIT_CONTAINERS: &[&str] = &["spec", "template", "spec", "initContainers"];

/// Container list locations per workload kind
const WORKLOAD_CONTAINER_PATHS: &[(&str, &[&[&str]])] = &[
    ("Deployment", &[POD_CONTAINERS, POD_INIT_CONTAINERS]),
    ("StatefulSet", &[POD_CONTAINERS, POD_INIT_CONTAINERS]),
];

const MIN_CANDIDATE_LENGTH: usize = 3;
const MAX_CANDIDATE_LENGTH: usize = 256;

/// Container list paths for `kind`, if it is a scanned workload
pub(crate) fn container_paths(kind: &str) -> Option<&'static [&'static [&'static str]]> {
    WORKLOAD_CONTAINER_PATHS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, paths)| *paths)
}

/// Iterate over the container mappings of a workload document
pub(crate) fn containers(document: &ManifestDocument) -> impl Iterator<Item = &Value> {
    document
        .kind()
        .and_then(container_paths)
        .unwrap_or(&[])
        .iter()
        .filter_map(|path| document.get(path).and_then(Value::as_array))
        .flatten()
        .filter(|container| container.is_object())
}

/// Extracts image references from Deployments and StatefulSets
#[derive(Debug, Default, Clone)]
pub struct ManifestImageScanner;

impl ManifestImageScanner {
    pub fn new() -> Self {
        Self
    }

    /// Collect every image referenced by workload containers.
    ///
    /// Besides each container's `image`, environment variable values that look
    /// like image references are collected too. Every candidate must pass
    /// [`ImageReference::validate_and_parse`]; the first failure aborts the scan.
    pub fn extract_images(&self, documents: &[ManifestDocument]) -> Result<BTreeSet<String>> {
        let mut images = BTreeSet::new();

        for document in documents {
            let Some(kind) = document.kind() else {
                continue;
            };
            if container_paths(kind).is_none() {
                trace!("Skipping {} document", kind);
                continue;
            }

            for container in containers(document) {
                Self::collect_container(container, &mut images);
            }
        }

        for image in &images {
            ImageReference::validate_and_parse(image)?;
        }

        debug!("Discovered {} images in manifest", images.len());
        Ok(images)
    }

    fn collect_container(container: &Value, images: &mut BTreeSet<String>) {
        if let Some(image) = container.get("image").and_then(Value::as_str) {
            trace!("Found container image {}", image);
            images.insert(image.to_string());
        }

        let env = container
            .get("env")
            .and_then(Value::as_array)
            .into_iter()
            .flatten();
        for var in env {
            if let Some(value) = var.get("value").and_then(Value::as_str) {
                if is_image_candidate(value) {
                    trace!("Found image-like env value {}", value);
                    images.insert(value.to_string());
                }
            }
        }
    }
}

/// Loose check for strings shaped like an image reference
pub fn is_image_candidate(value: &str) -> bool {
    (MIN_CANDIDATE_LENGTH..=MAX_CANDIDATE_LENGTH).contains(&value.len())
        && value.contains([':', '@'])
        && !value.contains([' ', '\t', '\n', '\r'])
}
