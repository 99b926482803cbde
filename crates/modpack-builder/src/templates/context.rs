//! Template context for rendering module templates

use modpack_core::types::{GroupVersionKind, LabelSettings, Link, Manager};
use modpack_core::ModuleConfig;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Link name of the raw manifest when it is served from a URL
pub const RAW_MANIFEST_LINK: &str = "rawManifest";

/// Everything the renderer needs beyond the module config
#[derive(Debug, Clone, Copy)]
pub struct TemplateInput<'a> {
    pub config: &'a ModuleConfig,
    /// Encoded component descriptor
    pub descriptor: &'a Value,
    /// Parsed default custom resource
    pub default_cr: Option<&'a Value>,
    pub cluster_scoped: bool,
    /// Manifest URL, when the manifest was not a local file
    pub manifest_url: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ModuleInfo {
    pub repository: String,
    pub documentation: String,
    pub icons: Vec<Link>,
}

/// Data handed to the module template
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TemplateContext {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub channel: Option<String>,
    pub module_name: String,
    pub version: String,
    pub mandatory: bool,
    pub requires_downtime: bool,
    pub info: ModuleInfo,
    pub associated_resources: Vec<GroupVersionKind>,
    pub manager: Option<Manager>,
    pub data: Option<Value>,
    pub descriptor: Value,
    pub resources: Vec<Link>,
}

impl TemplateContext {
    pub fn new(input: &TemplateInput<'_>, keys: &LabelSettings) -> Self {
        let config = input.config;

        let mut labels = config.labels.clone();
        labels.insert(keys.module_name.clone(), config.short_name().to_string());
        labels.insert(keys.managed_by.clone(), keys.managed_by_value.clone());
        if config.beta {
            labels.insert(keys.beta.clone(), "true".to_string());
        }
        if config.internal {
            labels.insert(keys.internal.clone(), "true".to_string());
        }

        let mut annotations = config.annotations.clone();
        annotations.insert(
            keys.cluster_scoped.clone(),
            input.cluster_scoped.to_string(),
        );

        let mut links = config.resources.clone();
        if let Some(url) = input.manifest_url {
            if links.get(RAW_MANIFEST_LINK).is_none() {
                links.insert(RAW_MANIFEST_LINK, url);
            }
        }

        Self {
            name: config.template_name(),
            namespace: config.namespace.clone(),
            labels,
            annotations,
            channel: config.channel.clone().filter(|c| !c.is_empty()),
            module_name: config.short_name().to_string(),
            version: config.version.clone(),
            mandatory: config.mandatory,
            requires_downtime: config.requires_downtime,
            info: ModuleInfo {
                repository: config.repository.clone(),
                documentation: config.documentation.clone(),
                icons: config.icons.to_links(),
            },
            associated_resources: config.associated_resources.clone(),
            manager: config.manager.clone(),
            data: input.default_cr.cloned(),
            descriptor: input.descriptor.clone(),
            resources: links.to_links(),
        }
    }
}
