//! Resource and source assembly
//!
//! Builds the logical artifact list of a module (module image, raw manifest,
//! default CR, metadata, discovered container images) plus its git source.

use crate::descriptor::ComponentDescriptor;
use crate::error::Result;
use modpack_core::types::{GroupVersionKind, Link, Manager, NamingSettings, PackagerSettings};
use modpack_core::ModuleConfig;
use modpack_image::ImageReference;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Media type of the inline metadata document
pub const METADATA_MEDIA_TYPE: &str = "application/x-yaml";

/// Extra identity key telling apart images that share a name and tag
pub const IMAGE_REPOSITORY_IDENTITY: &str = "repository";

/// What a resource represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    ModuleImage,
    RawManifest,
    DefaultCr,
    Metadata,
    /// A container image discovered in the manifest or security config
    OciImage,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ModuleImage => "module-image",
            Self::RawManifest => "raw-manifest",
            Self::DefaultCr => "default-cr",
            Self::Metadata => "metadata",
            Self::OciImage => "oci-image",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the bytes of a resource are reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceAccess {
    /// Set once the module image has been pushed
    Pending,
    /// Image in a container registry
    OciImage { image_reference: String },
    /// File packed into the component archive
    LocalFile { path: PathBuf },
    /// Small document carried in the descriptor itself
    Inline { media_type: String, data: String },
}

/// A named, versioned artifact of the module
///
/// A resource is identified by its name, version and extra identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    pub name: String,
    pub version: String,
    pub kind: ResourceKind,
    pub access: ResourceAccess,
    pub extra_identity: BTreeMap<String, String>,
}

impl ResolvedResource {
    fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        kind: ResourceKind,
        access: ResourceAccess,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind,
            access,
            extra_identity: BTreeMap::new(),
        }
    }

    /// Path of a file-backed resource
    pub fn local_path(&self) -> Option<&Path> {
        match &self.access {
            ResourceAccess::LocalFile { path } => Some(path),
            _ => None,
        }
    }
}

/// Provenance entry pointing at the module's git repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    pub name: String,
    pub version: String,
    pub repo_url: String,
    pub commit: String,
    pub labels: BTreeMap<String, String>,
}

/// Self-contained module metadata document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModuleMetadata<'a> {
    mandatory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    manager: Option<&'a Manager>,
    info: MetadataInfo<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resources: Vec<Link>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    associated_resources: Vec<GroupVersionKind>,
}

#[derive(Debug, Clone, Serialize)]
struct MetadataInfo<'a> {
    repository: &'a str,
    documentation: &'a str,
    icons: Vec<Link>,
}

/// Assembles the resources and sources of one packaging run
#[derive(Debug, Clone)]
pub struct ResourceSetBuilder {
    naming: NamingSettings,
}

impl ResourceSetBuilder {
    pub fn new(settings: &PackagerSettings) -> Self {
        Self {
            naming: settings.naming.clone(),
        }
    }

    /// Build the module's own resources.
    ///
    /// The module image and raw manifest are always present, the default CR
    /// only when one was resolved. Every resource carries the module version.
    pub fn build_resources(
        &self,
        config: &ModuleConfig,
        manifest_path: &Path,
        default_cr_path: Option<&Path>,
    ) -> Result<Vec<ResolvedResource>> {
        let version = config.version.as_str();
        let mut resources = vec![
            ResolvedResource::new(
                &self.naming.module_image_resource,
                version,
                ResourceKind::ModuleImage,
                ResourceAccess::Pending,
            ),
            ResolvedResource::new(
                &self.naming.raw_manifest_resource,
                version,
                ResourceKind::RawManifest,
                ResourceAccess::LocalFile {
                    path: manifest_path.to_path_buf(),
                },
            ),
        ];

        if let Some(path) = default_cr_path {
            resources.push(ResolvedResource::new(
                &self.naming.default_cr_resource,
                version,
                ResourceKind::DefaultCr,
                ResourceAccess::LocalFile {
                    path: path.to_path_buf(),
                },
            ));
        }

        resources.push(ResolvedResource::new(
            &self.naming.metadata_resource,
            version,
            ResourceKind::Metadata,
            ResourceAccess::Inline {
                media_type: METADATA_MEDIA_TYPE.to_string(),
                data: Self::metadata_document(config)?,
            },
        ));

        debug!("Built {} module resources", resources.len());
        Ok(resources)
    }

    /// One `oci-image` resource per discovered image.
    ///
    /// The name is the last path segment of the repository, so images from
    /// different registries or organizations can share a name and version.
    /// The full repository goes into the extra identity to keep them apart.
    pub fn build_image_resources(
        &self,
        images: &BTreeSet<String>,
    ) -> Result<Vec<ResolvedResource>> {
        images
            .iter()
            .map(|image| -> Result<ResolvedResource> {
                let reference = ImageReference::validate_and_parse(image)?;
                let (version, name) = reference.version_and_name();
                debug!("Image {} registered as {}:{}", image, name, version);
                let mut resource = ResolvedResource::new(
                    name,
                    version,
                    ResourceKind::OciImage,
                    ResourceAccess::OciImage {
                        image_reference: reference.full,
                    },
                );
                resource
                    .extra_identity
                    .insert(IMAGE_REPOSITORY_IDENTITY.to_string(), reference.repository);
                Ok(resource)
            })
            .collect()
    }

    /// Set the descriptor's git source.
    ///
    /// A descriptor holds exactly one git source; an earlier one of the same
    /// name is replaced.
    pub fn add_git_source(
        &self,
        descriptor: &mut ComponentDescriptor,
        repo_url: &str,
        commit: &str,
        extra_labels: BTreeMap<String, String>,
    ) {
        let mut labels = extra_labels;
        labels.insert(
            self.naming.git_ref_label.clone(),
            self.naming.git_ref_value.clone(),
        );

        let source = GitSource {
            name: self.naming.git_source_name.clone(),
            version: descriptor.version.clone(),
            repo_url: repo_url.to_string(),
            commit: commit.to_string(),
            labels,
        };

        descriptor.sources.retain(|s| s.name != source.name);
        debug!("Adding git source {} at {}", source.repo_url, source.commit);
        descriptor.sources.push(source);
    }

    fn metadata_document(config: &ModuleConfig) -> Result<String> {
        let metadata = ModuleMetadata {
            mandatory: config.mandatory,
            manager: config.manager.as_ref(),
            info: MetadataInfo {
                repository: &config.repository,
                documentation: &config.documentation,
                icons: config.icons.to_links(),
            },
            resources: config.resources.to_links(),
            associated_resources: config.associated_resources.clone(),
        };
        Ok(serde_yaml_ng::to_string(&metadata)?)
    }
}
