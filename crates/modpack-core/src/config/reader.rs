//! Module configuration file loading

use super::validator::validate_module_config;
use crate::error::{Error, Result};
use crate::schema::{SchemaValidator, MODULE_CONFIG_SCHEMA};
use crate::types::{ModuleConfig, NamingSettings};
use camino::Utf8Path;
use serde_json::Value;
use std::fs;
use tracing::debug;

/// Reads module-config.yaml documents
pub struct ModuleConfigReader<'a> {
    schema_validator: &'a SchemaValidator,
    default_namespace: String,
}

impl<'a> ModuleConfigReader<'a> {
    /// Create a reader that defaults the namespace from `naming`
    pub fn new(schema_validator: &'a SchemaValidator, naming: &NamingSettings) -> Self {
        Self {
            schema_validator,
            default_namespace: naming.default_namespace.clone(),
        }
    }

    /// Parse the configuration file at `path`
    ///
    /// Structural problems (wrong types, unknown keys) are reported as
    /// schema validation errors; semantic rules are left to [`validate_module_config`].
    pub fn parse(&self, path: &Utf8Path) -> Result<ModuleConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;
        debug!("Parsing module config from {}", path);
        self.parse_str(&content)
    }

    /// Parse configuration content
    pub fn parse_str(&self, content: &str) -> Result<ModuleConfig> {
        let value: Value = serde_yaml_ng::from_str(content)?;
        self.schema_validator.validate(&value, MODULE_CONFIG_SCHEMA)?;

        let mut config: ModuleConfig = serde_json::from_value(value)?;
        if config.namespace.trim().is_empty() {
            config.namespace = self.default_namespace.clone();
        }
        Ok(config)
    }

    /// Parse and validate the configuration file at `path`
    pub fn read_and_validate(&self, path: &Utf8Path) -> Result<ModuleConfig> {
        let config = self.parse(path)?;
        validate_module_config(&config)?;
        Ok(config)
    }
}
