//! Custom resource scope lookups
//!
//! Matches a default custom resource against the CustomResourceDefinitions
//! shipped in the raw manifest to find out whether the module's resource is
//! cluster scoped.

use crate::error::{Error, Result};
use crate::manifest::{parse_documents, read_documents, ManifestDocument};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

const CRD_KIND: &str = "CustomResourceDefinition";

/// Declared scope of a custom resource definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrdScope {
    Cluster,
    Namespaced,
    /// The CRD declares a scope value neither Kubernetes nor we recognise
    Unknown,
}

impl CrdScope {
    fn from_spec(value: Option<&str>) -> Self {
        match value {
            Some("Cluster") => Self::Cluster,
            Some("Namespaced") => Self::Namespaced,
            _ => Self::Unknown,
        }
    }

    pub fn is_cluster(self) -> bool {
        self == Self::Cluster
    }
}

impl fmt::Display for CrdScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster => write!(f, "Cluster"),
            Self::Namespaced => write!(f, "Namespaced"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Group and kind of the default custom resource
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResourceIdentity {
    group: String,
    kind: String,
}

/// Determines the scope of a module's default custom resource
#[derive(Debug, Default, Clone)]
pub struct CrdScopeResolver;

impl CrdScopeResolver {
    pub fn new() -> Self {
        Self
    }

    /// Whether the default CR is cluster scoped.
    ///
    /// No default CR, or no CRD in the manifest matching it, means namespaced.
    pub fn is_cluster_scoped(
        &self,
        default_cr: Option<&Path>,
        raw_manifest: &Path,
    ) -> Result<bool> {
        let Some(default_cr) = default_cr.filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(false);
        };

        Ok(self
            .find_scope(default_cr, raw_manifest)?
            .is_some_and(CrdScope::is_cluster))
    }

    /// Scope of the CRD defining the default CR, or `None` when the manifest
    /// has no matching definition
    pub fn find_scope(&self, default_cr: &Path, raw_manifest: &Path) -> Result<Option<CrdScope>> {
        let identity = Self::read_identity(default_cr)?;
        debug!(
            "Looking up CRD for group '{}' kind '{}' in {}",
            identity.group,
            identity.kind,
            raw_manifest.display()
        );

        let documents = read_documents(raw_manifest)?;
        let scope = Self::match_scope(&identity, &documents);

        match scope {
            Some(scope) => debug!("Default CR {} is {} scoped", identity.kind, scope),
            None => debug!("No CRD found for {}, assuming namespaced", identity.kind),
        }
        Ok(scope)
    }

    fn read_identity(path: &Path) -> Result<ResourceIdentity> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::default_cr_read_failed(&display, e.to_string()))?;
        let document = parse_documents(&content)
            .map_err(|e| Error::default_cr_read_failed(&display, e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::default_cr_read_failed(&display, "file contains no document"))?;

        let group = document
            .api_group()
            .ok_or_else(|| Error::default_cr_read_failed(&display, "missing apiVersion"))?;
        let kind = document
            .kind()
            .ok_or_else(|| Error::default_cr_read_failed(&display, "missing kind"))?;

        Ok(ResourceIdentity {
            group: group.to_string(),
            kind: kind.to_string(),
        })
    }

    fn match_scope(
        identity: &ResourceIdentity,
        documents: &[ManifestDocument],
    ) -> Option<CrdScope> {
        documents
            .iter()
            .filter(|doc| doc.kind() == Some(CRD_KIND))
            .find(|doc| {
                doc.get_str(&["spec", "group"]) == Some(identity.group.as_str())
                    && doc.get_str(&["spec", "names", "kind"]) == Some(identity.kind.as_str())
            })
            .map(|doc| CrdScope::from_spec(doc.get_str(&["spec", "scope"])))
    }
}
