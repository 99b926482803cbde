//! Component descriptor model and its external collaborators
//!
//! The packaging pipeline only needs a small contract from the component
//! model: validate and encode a descriptor ([`DescriptorCodec`]) and turn it
//! plus its local blobs into a pushed archive ([`ArchivePublisher`]).

use crate::error::{Error, Result};
use crate::resources::{GitSource, ResolvedResource, ResourceAccess, ResourceKind};
use async_trait::async_trait;
use semver::Version;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use tracing::debug;

/// Default descriptor schema version
pub const SCHEMA_V2: &str = "v2";

/// Component descriptor assembled by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub name: String,
    pub version: String,
    pub provider: String,
    pub labels: BTreeMap<String, String>,
    pub resources: Vec<ResolvedResource>,
    pub sources: Vec<GitSource>,
}

impl ComponentDescriptor {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            provider: provider.into(),
            labels: BTreeMap::new(),
            resources: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// `(resource name, local path)` pairs to pack into the archive
    pub fn local_blobs(&self) -> Vec<LocalBlob> {
        self.resources
            .iter()
            .filter_map(|r| {
                r.local_path().map(|path| LocalBlob {
                    resource: r.name.clone(),
                    path: path.to_path_buf(),
                })
            })
            .collect()
    }
}

/// A file to be packed into the component archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBlob {
    pub resource: String,
    pub path: PathBuf,
}

/// Validates and encodes component descriptors
pub trait DescriptorCodec: Send + Sync {
    /// Check the descriptor is well formed
    fn validate(&self, descriptor: &ComponentDescriptor) -> Result<()>;

    /// Encode the descriptor for the given schema version
    fn convert(&self, descriptor: &ComponentDescriptor, schema_version: &str) -> Result<Value>;
}

/// Builds the component archive and uploads it
#[async_trait]
pub trait ArchivePublisher: Send + Sync {
    async fn publish(&self, descriptor: &ComponentDescriptor, blobs: &[LocalBlob]) -> Result<()>;
}

/// Reference codec producing the `v2` descriptor layout
#[derive(Debug, Default, Clone)]
pub struct YamlDescriptorCodec;

impl YamlDescriptorCodec {
    pub fn new() -> Self {
        Self
    }

    fn resource_type(kind: ResourceKind) -> &'static str {
        match kind {
            ResourceKind::ModuleImage | ResourceKind::OciImage => "ociArtifact",
            ResourceKind::RawManifest | ResourceKind::DefaultCr => "directoryTree",
            ResourceKind::Metadata => "plainText",
        }
    }

    fn access(resource: &ResolvedResource) -> Value {
        match &resource.access {
            ResourceAccess::Pending => json!({ "type": "none" }),
            ResourceAccess::OciImage { image_reference } => json!({
                "type": "ociArtifact",
                "imageReference": image_reference,
            }),
            ResourceAccess::LocalFile { .. } => json!({
                "type": "localBlob",
                "localReference": resource.name,
                "mediaType": "application/x-tar",
            }),
            ResourceAccess::Inline { media_type, data } => json!({
                "type": "inline",
                "mediaType": media_type,
                "data": data,
            }),
        }
    }

    fn labels(labels: &BTreeMap<String, String>) -> Value {
        Value::Array(
            labels
                .iter()
                .map(|(name, value)| json!({ "name": name, "value": value }))
                .collect(),
        )
    }

    fn encode_v2(descriptor: &ComponentDescriptor) -> Value {
        let resources: Vec<Value> = descriptor
            .resources
            .iter()
            .map(|r| {
                let relation = if r.kind == ResourceKind::OciImage {
                    "external"
                } else {
                    "local"
                };
                let mut entry = Map::new();
                entry.insert("name".into(), json!(r.name));
                entry.insert("version".into(), json!(r.version));
                entry.insert("type".into(), json!(Self::resource_type(r.kind)));
                entry.insert("relation".into(), json!(relation));
                if !r.extra_identity.is_empty() {
                    entry.insert("extraIdentity".into(), json!(r.extra_identity));
                }
                entry.insert("access".into(), Self::access(r));
                Value::Object(entry)
            })
            .collect();

        let sources: Vec<Value> = descriptor
            .sources
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "version": s.version,
                    "type": "Github",
                    "labels": Self::labels(&s.labels),
                    "access": {
                        "type": "gitHub",
                        "repoUrl": s.repo_url,
                        "commit": s.commit,
                    },
                })
            })
            .collect();

        json!({
            "meta": { "schemaVersion": SCHEMA_V2 },
            "component": {
                "name": descriptor.name,
                "version": descriptor.version,
                "provider": descriptor.provider,
                "labels": Self::labels(&descriptor.labels),
                "repositoryContexts": [],
                "componentReferences": [],
                "resources": resources,
                "sources": sources,
            },
        })
    }
}

impl DescriptorCodec for YamlDescriptorCodec {
    fn validate(&self, descriptor: &ComponentDescriptor) -> Result<()> {
        if descriptor.name.is_empty() {
            return Err(Error::invalid_descriptor("component name must not be empty"));
        }
        Version::parse(&descriptor.version).map_err(|e| {
            Error::invalid_descriptor(format!(
                "component version '{}' is not semantic: {}",
                descriptor.version, e
            ))
        })?;
        if descriptor.provider.is_empty() {
            return Err(Error::invalid_descriptor("provider must not be empty"));
        }

        let mut seen = HashSet::new();
        for resource in &descriptor.resources {
            if resource.name.is_empty() || resource.version.is_empty() {
                return Err(Error::invalid_descriptor(format!(
                    "{} resource has an empty name or version",
                    resource.kind
                )));
            }
            let identity = (
                resource.name.as_str(),
                resource.version.as_str(),
                &resource.extra_identity,
            );
            if !seen.insert(identity) {
                return Err(Error::duplicate_resource(&resource.name, &resource.version));
            }
        }

        for source in &descriptor.sources {
            if source.commit.is_empty() {
                return Err(Error::invalid_descriptor(format!(
                    "source '{}' has no commit",
                    source.name
                )));
            }
        }

        debug!("Component descriptor {}:{} is valid", descriptor.name, descriptor.version);
        Ok(())
    }

    fn convert(&self, descriptor: &ComponentDescriptor, schema_version: &str) -> Result<Value> {
        match schema_version {
            SCHEMA_V2 => Ok(Self::encode_v2(descriptor)),
            other => Err(Error::UnsupportedSchemaVersion {
                version: other.to_string(),
            }),
        }
    }
}
