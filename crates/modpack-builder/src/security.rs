//! Security-scan configuration (sec-scanners-config.yaml)

use crate::error::{Error, Result};
use modpack_core::types::LabelSettings;
use modpack_image::ImageReference;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Scanner settings shipped alongside a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecurityScanConfig {
    pub module_name: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub rc_tag: String,
    #[serde(default)]
    pub dev_branch: String,
    /// Images handed to the binary scanner
    #[serde(default)]
    pub bdba: Vec<String>,
    #[serde(default)]
    pub mend: MendConfig,
}

/// Source scanner settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MendConfig {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl SecurityScanConfig {
    /// Read and check the config file at `path`
    pub fn from_file(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::invalid_security_config(&display, e.to_string()))?;
        let config: Self = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_security_config(&display, e.to_string()))?;

        if config.module_name.trim().is_empty() {
            return Err(Error::invalid_security_config(&display, "module-name must not be empty"));
        }

        debug!(
            "Loaded security scan config for {} ({} images)",
            config.module_name,
            config.bdba.len()
        );
        Ok(config)
    }

    /// Validate the scanner images and add them to `images`
    pub fn merge_images(&self, images: &mut BTreeSet<String>) -> Result<()> {
        for image in &self.bdba {
            ImageReference::validate_and_parse(image)?;
            images.insert(image.clone());
        }
        Ok(())
    }

    /// Labels describing the scan setup, keyed under the security prefix
    pub fn labels(&self, settings: &LabelSettings) -> BTreeMap<String, String> {
        let prefix = &settings.security_prefix;
        let mut labels = BTreeMap::new();
        let mut put = |key: &str, value: String| {
            if !value.is_empty() {
                labels.insert(format!("{}/{}", prefix, key), value);
            }
        };

        put("rc-tag", self.rc_tag.clone());
        put("dev-branch", self.dev_branch.clone());
        put("language", self.mend.language.clone());
        put("exclude", self.mend.exclude.join(","));
        labels
    }
}
