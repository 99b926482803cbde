//! Packager settings
//!
//! Values that older tooling kept as package-level constants (label keys,
//! resource names, timeouts). They are loaded once and handed to each
//! component's constructor.

use serde::{Deserialize, Serialize};

/// Complete packager settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackagerSettings {
    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkSettings,

    /// Names of generated resources, temp files and defaults
    #[serde(default)]
    pub naming: NamingSettings,

    /// Label and annotation keys written into the module template
    #[serde(default)]
    pub labels: LabelSettings,
}

/// Network and HTTP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkSettings {
    /// Ceiling for a single remote file download, in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            download_timeout_secs: default_download_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_download_timeout() -> u64 {
    20
}

fn default_user_agent() -> String {
    format!(
        "modpack/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Resource names, temp-file naming and defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NamingSettings {
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Prefix of temp files created for downloaded references
    #[serde(default = "default_temp_prefix")]
    pub temp_file_prefix: String,

    #[serde(default = "default_module_image_resource")]
    pub module_image_resource: String,

    #[serde(default = "default_raw_manifest_resource")]
    pub raw_manifest_resource: String,

    #[serde(default = "default_default_cr_resource")]
    pub default_cr_resource: String,

    #[serde(default = "default_metadata_resource")]
    pub metadata_resource: String,

    #[serde(default = "default_git_source_name")]
    pub git_source_name: String,

    /// Label key identifying which git reference a source entry points at
    #[serde(default = "default_git_ref_label")]
    pub git_ref_label: String,

    #[serde(default = "default_git_ref_value")]
    pub git_ref_value: String,

    /// Provider recorded in the component descriptor
    #[serde(default = "default_provider")]
    pub provider: String,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            temp_file_prefix: default_temp_prefix(),
            module_image_resource: default_module_image_resource(),
            raw_manifest_resource: default_raw_manifest_resource(),
            default_cr_resource: default_default_cr_resource(),
            metadata_resource: default_metadata_resource(),
            git_source_name: default_git_source_name(),
            git_ref_label: default_git_ref_label(),
            git_ref_value: default_git_ref_value(),
            provider: default_provider(),
        }
    }
}

fn default_namespace() -> String {
    "kcp-system".to_string()
}
fn default_temp_prefix() -> String {
    "modpack-".to_string()
}
fn default_module_image_resource() -> String {
    "module-image".to_string()
}
fn default_raw_manifest_resource() -> String {
    "raw-manifest".to_string()
}
fn default_default_cr_resource() -> String {
    "default-cr".to_string()
}
fn default_metadata_resource() -> String {
    "metadata".to_string()
}
fn default_git_source_name() -> String {
    "module-sources".to_string()
}
fn default_git_ref_label() -> String {
    "git.kyma-project.io/ref".to_string()
}
fn default_git_ref_value() -> String {
    "HEAD".to_string()
}
fn default_provider() -> String {
    "kyma-project.io".to_string()
}

/// Label and annotation keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LabelSettings {
    #[serde(default = "default_module_name_label")]
    pub module_name: String,

    #[serde(default = "default_managed_by_label")]
    pub managed_by: String,

    #[serde(default = "default_managed_by_value")]
    pub managed_by_value: String,

    #[serde(default = "default_beta_label")]
    pub beta: String,

    #[serde(default = "default_internal_label")]
    pub internal: String,

    /// Annotation carrying `"true"` / `"false"` for cluster-scoped default CRs
    #[serde(default = "default_cluster_scoped_annotation")]
    pub cluster_scoped: String,

    /// Prefix for security-scan labels on the git source
    #[serde(default = "default_security_label_prefix")]
    pub security_prefix: String,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            module_name: default_module_name_label(),
            managed_by: default_managed_by_label(),
            managed_by_value: default_managed_by_value(),
            beta: default_beta_label(),
            internal: default_internal_label(),
            cluster_scoped: default_cluster_scoped_annotation(),
            security_prefix: default_security_label_prefix(),
        }
    }
}

fn default_module_name_label() -> String {
    "operator.kyma-project.io/module-name".to_string()
}
fn default_managed_by_label() -> String {
    "operator.kyma-project.io/managed-by".to_string()
}
fn default_managed_by_value() -> String {
    "kyma".to_string()
}
fn default_beta_label() -> String {
    "operator.kyma-project.io/beta".to_string()
}
fn default_internal_label() -> String {
    "operator.kyma-project.io/internal".to_string()
}
fn default_cluster_scoped_annotation() -> String {
    "operator.kyma-project.io/is-cluster-scoped".to_string()
}
fn default_security_label_prefix() -> String {
    "security.kyma-project.io".to_string()
}
