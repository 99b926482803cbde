//! JSON Schema validation for module configuration documents

use crate::error::{Error, Result};
use jsonschema::Validator;
use rust_embed::RustEmbed;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Schema name of the module configuration document
pub const MODULE_CONFIG_SCHEMA: &str = "module-config";

/// Embedded schema files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/schemas/"]
#[prefix = ""]
struct EmbeddedSchemas;

/// Schema validator with pre-compiled schemas
#[derive(Debug)]
pub struct SchemaValidator {
    /// Compiled schemas by name
    schemas: HashMap<String, Validator>,
}

impl SchemaValidator {
    /// Create a new schema validator with embedded schemas
    pub fn new() -> Result<Self> {
        let mut schemas = HashMap::new();

        for file in EmbeddedSchemas::iter() {
            if !file.ends_with(".schema.json") {
                continue;
            }
            let name = file.trim_end_matches(".schema.json").to_string();
            debug!("Loading embedded schema: {}", name);

            if let Some(content) = EmbeddedSchemas::get(&file) {
                let json_str = std::str::from_utf8(&content.data).map_err(|_| {
                    Error::invalid_config(format!("Invalid UTF-8 in schema: {}", file))
                })?;
                let schema_value: Value = serde_json::from_str(json_str)?;
                schemas.insert(name.clone(), Self::compile(&name, &schema_value)?);
            }
        }

        if schemas.is_empty() {
            return Err(Error::schema_not_found("no embedded schemas available"));
        }

        Ok(Self { schemas })
    }

    fn compile(name: &str, schema: &Value) -> Result<Validator> {
        jsonschema::validator_for(schema).map_err(|e| {
            Error::invalid_config(format!("Failed to compile schema {}: {}", name, e))
        })
    }

    /// Validate JSON value against a schema
    pub fn validate(&self, value: &Value, schema_name: &str) -> Result<()> {
        let schema = self
            .schemas
            .get(schema_name)
            .ok_or_else(|| Error::schema_not_found(schema_name))?;

        let errors: Vec<String> = schema
            .iter_errors(value)
            .map(|e| {
                let path = e.instance_path().to_string();
                if path.is_empty() {
                    format!("  - {}", e)
                } else {
                    format!("  - {}: {}", path, e)
                }
            })
            .collect();

        if !errors.is_empty() {
            return Err(Error::schema_validation(errors));
        }

        Ok(())
    }
}
