//! Module configuration types (module-config.yaml)

use super::reference::FileReference;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Parsed module configuration.
///
/// Read once from the configuration file and treated as read-only by every
/// packaging stage afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    /// Reverse-domain-like module identifier, e.g. `kyma-project.io/module/template-operator`
    pub name: String,

    /// Strict semantic version of the module
    pub version: String,

    /// Release channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Raw manifest reference (local path or URL)
    pub manifest: FileReference,

    /// Default custom resource reference (local path or URL)
    #[serde(
        default,
        rename = "defaultCR",
        skip_serializing_if = "FileReference::is_empty"
    )]
    pub default_cr: FileReference,

    /// Security-scan configuration reference (local path or URL)
    #[serde(default, skip_serializing_if = "FileReference::is_empty")]
    pub security: FileReference,

    /// Namespace the module template is rendered into
    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub mandatory: bool,

    #[serde(default)]
    pub internal: bool,

    #[serde(default)]
    pub beta: bool,

    #[serde(default)]
    pub requires_downtime: bool,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    /// Workload that reconciles the module once installed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<Manager>,

    /// Source repository URL
    #[serde(default)]
    pub repository: String,

    /// Documentation URL
    #[serde(default)]
    pub documentation: String,

    /// Named icon links
    #[serde(default)]
    pub icons: LinkMap,

    /// Named resource links
    #[serde(default)]
    pub resources: LinkMap,

    /// Resources created by the module that should be cleaned up with it
    #[serde(default)]
    pub associated_resources: Vec<GroupVersionKind>,
}

impl ModuleConfig {
    /// Last path segment of the module name (`template-operator` for
    /// `kyma-project.io/module/template-operator`)
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Name of the rendered module template: `<short-name>-<version>`
    pub fn template_name(&self) -> String {
        format!("{}-{}", self.short_name(), self.version)
    }
}

/// Group/version/kind triple
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupVersionKind {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }
}

/// Manager workload descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(flatten)]
    pub gvk: GroupVersionKind,
}

/// A single named link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub link: String,
}

/// Named links, written as a list of `{name, link}` entries.
///
/// Entries are keyed by name; a repeated name is rejected while
/// deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMap(BTreeMap<String, String>);

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, link: impl Into<String>) {
        self.0.insert(name.into(), link.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries as `{name, link}` pairs, ordered by name
    pub fn to_links(&self) -> Vec<Link> {
        self.iter()
            .map(|(name, link)| Link {
                name: name.to_string(),
                link: link.to_string(),
            })
            .collect()
    }
}

impl FromIterator<(String, String)> for LinkMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for LinkMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_links().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LinkMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let links = Option::<Vec<Link>>::deserialize(deserializer)?.unwrap_or_default();
        let mut map = BTreeMap::new();
        for Link { name, link } in links {
            if map.contains_key(&name) {
                return Err(D::Error::custom(format!("duplicate link name '{}'", name)));
            }
            map.insert(name, link);
        }
        Ok(Self(map))
    }
}
