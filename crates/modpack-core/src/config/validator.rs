//! Semantic validation of module configuration
//!
//! Rules are checked in a fixed order and the first failure is returned, so
//! the same broken config always produces the same message.

use crate::error::{Error, Result};
use crate::types::{FileReference, GroupVersionKind, LinkMap, Manager, ModuleConfig};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

const MODULE_NAME_MAX_LENGTH: usize = 255;
const NAMESPACE_MAX_LENGTH: usize = 63;
const CHANNEL_MIN_LENGTH: usize = 3;
const CHANNEL_MAX_LENGTH: usize = 32;

/// Workload kinds a manager may reference
const MANAGER_KINDS: &[&str] = &["Deployment", "StatefulSet"];

static MODULE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9]+(?:[.\-][a-z0-9]+)*/)+[a-z0-9]+(?:[.\-][a-z0-9]+)*$")
        .expect("module name regex is valid")
});

static NAMESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("namespace regex is valid")
});

static CHANNEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+$").expect("channel regex is valid"));

/// Validate a parsed module configuration
pub fn validate_module_config(config: &ModuleConfig) -> Result<()> {
    validate_module_name(&config.name)?;
    validate_module_version(&config.version)?;
    validate_namespace("namespace", &config.namespace)?;
    validate_manifest(&config.manifest)?;
    validate_https_url("repository", &config.repository)?;
    validate_https_url("documentation", &config.documentation)?;
    validate_icons(&config.icons)?;
    validate_links("resources", &config.resources)?;
    if !config.default_cr.is_empty() {
        validate_reference_url("defaultCR", &config.default_cr)?;
    }
    validate_associated_resources(&config.associated_resources)?;
    if let Some(manager) = &config.manager {
        validate_manager(manager)?;
    }
    if let Some(channel) = &config.channel {
        validate_channel(channel)?;
    }
    Ok(())
}

fn validate_module_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_field("name", "must not be empty"));
    }
    if name.len() > MODULE_NAME_MAX_LENGTH {
        return Err(Error::invalid_field(
            "name",
            format!("exceeds {} characters", MODULE_NAME_MAX_LENGTH),
        ));
    }
    if name.to_lowercase() != name {
        return Err(Error::invalid_field(
            "name",
            format!("'{}' must be lowercase", name),
        ));
    }
    if !MODULE_NAME_RE.is_match(name) {
        return Err(Error::invalid_field(
            "name",
            format!(
                "'{}' must be a domain followed by at least one path segment, \
                 e.g. kyma-project.io/module/sample",
                name
            ),
        ));
    }
    Ok(())
}

fn validate_module_version(version: &str) -> Result<()> {
    semver::Version::parse(version).map_err(|e| {
        Error::invalid_field(
            "version",
            format!("'{}' is not a strict semantic version: {}", version, e),
        )
    })?;
    Ok(())
}

fn validate_namespace(field: &str, namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Err(Error::invalid_field(field, "must not be empty"));
    }
    if namespace.len() > NAMESPACE_MAX_LENGTH {
        return Err(Error::invalid_field(
            field,
            format!("exceeds {} characters", NAMESPACE_MAX_LENGTH),
        ));
    }
    if !NAMESPACE_RE.is_match(namespace) {
        return Err(Error::invalid_field(
            field,
            format!("'{}' is not a valid DNS label", namespace),
        ));
    }
    Ok(())
}

fn validate_manifest(manifest: &FileReference) -> Result<()> {
    if manifest.is_empty() {
        return Err(Error::invalid_field("manifest", "must not be empty"));
    }
    validate_reference_url("manifest", manifest)
}

/// Remote references must be HTTPS; local paths are checked when resolved
fn validate_reference_url(field: &str, reference: &FileReference) -> Result<()> {
    if reference.is_url() {
        validate_https_url(field, reference.as_str())?;
    }
    Ok(())
}

fn validate_https_url(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_field(field, "must not be empty"));
    }
    let url = Url::parse(value).map_err(|e| {
        Error::invalid_field(field, format!("'{}' is not a valid URL: {}", value, e))
    })?;
    if url.scheme() != "https" {
        return Err(Error::invalid_field(
            field,
            format!("'{}' must use the https scheme", value),
        ));
    }
    if !url.has_host() {
        return Err(Error::invalid_field(
            field,
            format!("'{}' has no host", value),
        ));
    }
    Ok(())
}

fn validate_icons(icons: &LinkMap) -> Result<()> {
    if icons.is_empty() {
        return Err(Error::invalid_field("icons", "must contain at least one icon"));
    }
    validate_links("icons", icons)
}

fn validate_links(field: &str, links: &LinkMap) -> Result<()> {
    for (name, link) in links.iter() {
        if name.is_empty() {
            return Err(Error::invalid_field(field, "entry name must not be empty"));
        }
        if link.is_empty() {
            return Err(Error::invalid_field(
                format!("{}[{}]", field, name),
                "link must not be empty",
            ));
        }
        validate_https_url(&format!("{}[{}]", field, name), link)?;
    }
    Ok(())
}

fn validate_gvk(field: &str, gvk: &GroupVersionKind) -> Result<()> {
    for (part, value) in [
        ("group", &gvk.group),
        ("version", &gvk.version),
        ("kind", &gvk.kind),
    ] {
        if value.is_empty() {
            return Err(Error::invalid_field(
                format!("{}.{}", field, part),
                "must not be empty",
            ));
        }
    }
    Ok(())
}

fn validate_associated_resources(resources: &[GroupVersionKind]) -> Result<()> {
    for (index, gvk) in resources.iter().enumerate() {
        validate_gvk(&format!("associatedResources[{}]", index), gvk)?;
    }
    Ok(())
}

fn validate_manager(manager: &Manager) -> Result<()> {
    if manager.name.is_empty() {
        return Err(Error::invalid_field("manager.name", "must not be empty"));
    }
    validate_gvk("manager", &manager.gvk)?;
    if !MANAGER_KINDS.contains(&manager.gvk.kind.as_str()) {
        return Err(Error::invalid_field(
            "manager.kind",
            format!(
                "'{}' is not supported, expected one of: {}",
                manager.gvk.kind,
                MANAGER_KINDS.join(", ")
            ),
        ));
    }
    if let Some(namespace) = &manager.namespace {
        validate_namespace("manager.namespace", namespace)?;
    }
    Ok(())
}

fn validate_channel(channel: &str) -> Result<()> {
    let len = channel.len();
    if !(CHANNEL_MIN_LENGTH..=CHANNEL_MAX_LENGTH).contains(&len) || !CHANNEL_RE.is_match(channel) {
        return Err(Error::invalid_field(
            "channel",
            format!(
                "'{}' must be {}-{} lowercase letters",
                channel, CHANNEL_MIN_LENGTH, CHANNEL_MAX_LENGTH
            ),
        ));
    }
    Ok(())
}
