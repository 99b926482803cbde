//! Module template rendering
//!
//! Uses a Tera template to produce the ModuleTemplate document handed to the
//! cluster, embedding the encoded component descriptor and default CR.

mod context;

pub use context::{TemplateInput, RAW_MANIFEST_LINK};

use crate::error::Result;
use context::TemplateContext;
use modpack_core::types::{LabelSettings, PackagerSettings};
use modpack_core::utils::indent;
use std::collections::HashMap;
use tera::{Context, Tera, Value};
use tracing::debug;

const MODULE_TEMPLATE: &str = "moduletemplate.yaml";

/// Renders ModuleTemplate documents
pub struct ModuleTemplateRenderer {
    tera: Tera,
    labels: LabelSettings,
}

impl ModuleTemplateRenderer {
    /// Create a renderer with the embedded template
    pub fn new(settings: &PackagerSettings) -> Result<Self> {
        let mut tera = Tera::default();
        tera.register_filter("to_yaml", to_yaml_filter);
        tera.add_raw_template(MODULE_TEMPLATE, include_str!("moduletemplate.yaml.tera"))?;

        Ok(Self {
            tera,
            labels: settings.labels.clone(),
        })
    }

    /// Render the module template
    pub fn render(&self, input: &TemplateInput<'_>) -> Result<String> {
        debug!("Rendering module template for {}", input.config.name);
        let context = Context::from_serialize(TemplateContext::new(input, &self.labels))?;
        Ok(self.tera.render(MODULE_TEMPLATE, &context)?)
    }
}

/// Serialize a value as a block YAML document indented by `indent` spaces
fn to_yaml_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let width = args.get("indent").and_then(Value::as_u64).unwrap_or(0) as usize;
    let yaml = serde_yaml_ng::to_string(value)
        .map_err(|e| tera::Error::msg(format!("Failed to encode YAML: {}", e)))?;
    Ok(Value::String(indent(&yaml, width)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use modpack_core::ModuleConfig;
    use serde_json::json;

    fn config() -> ModuleConfig {
        serde_json::from_value(json!({
            "name": "kyma-project.io/module/template-operator",
            "version": "1.0.1",
            "channel": "regular",
            "manifest": "https://example.com/manifest.yaml",
            "namespace": "kcp-system",
            "beta": true,
            "labels": { "team": "sample" },
            "annotations": { "note": "multi\nline" },
            "repository": "https://github.com/kyma-project/template-operator",
            "documentation": "https://kyma-project.io/docs/template-operator",
            "icons": [{ "name": "module-icon", "link": "https://example.com/icon.png" }],
            "resources": [{
                "name": "source",
                "link": "https://github.com/kyma-project/template-operator"
            }],
            "manager": {
                "name": "template-operator-controller-manager",
                "group": "apps",
                "version": "v1",
                "kind": "Deployment"
            },
            "associatedResources": [{
                "group": "operator.kyma-project.io",
                "version": "v1alpha1",
                "kind": "Sample"
            }]
        }))
        .unwrap()
    }

    fn render(
        config: &ModuleConfig,
        cluster_scoped: bool,
        default_cr: Option<&serde_json::Value>,
    ) -> serde_json::Value {
        let renderer = ModuleTemplateRenderer::new(&PackagerSettings::default()).unwrap();
        let descriptor = json!({
            "meta": { "schemaVersion": "v2" },
            "component": { "name": config.name }
        });
        let rendered = renderer
            .render(&TemplateInput {
                config,
                descriptor: &descriptor,
                default_cr,
                cluster_scoped,
                manifest_url: config.manifest.url().map(|u| u.as_str()),
            })
            .unwrap();
        serde_yaml_ng::from_str(&rendered)
            .unwrap_or_else(|e| panic!("invalid YAML ({}):\n{}", e, rendered))
    }

    #[test]
    fn test_metadata() {
        let doc = render(&config(), false, None);
        assert_eq!(doc["kind"], "ModuleTemplate");
        assert_eq!(doc["metadata"]["name"], "template-operator-1.0.1");
        assert_eq!(doc["metadata"]["namespace"], "kcp-system");

        let labels = &doc["metadata"]["labels"];
        assert_eq!(labels["operator.kyma-project.io/module-name"], "template-operator");
        assert_eq!(labels["operator.kyma-project.io/managed-by"], "kyma");
        assert_eq!(labels["operator.kyma-project.io/beta"], "true");
        assert!(labels.get("operator.kyma-project.io/internal").is_none());
        assert_eq!(labels["team"], "sample");

        let annotations = &doc["metadata"]["annotations"];
        assert_eq!(annotations["operator.kyma-project.io/is-cluster-scoped"], "false");
        assert_eq!(annotations["note"], "multi\nline");
    }

    #[test]
    fn test_cluster_scope_annotation_is_string() {
        let doc = render(&config(), true, None);
        assert_eq!(
            doc["metadata"]["annotations"]["operator.kyma-project.io/is-cluster-scoped"],
            json!("true")
        );
    }

    #[test]
    fn test_template_spec_section() {
        let cr = json!({
            "apiVersion": "operator.kyma-project.io/v1alpha1",
            "kind": "Sample",
            "spec": { "replicas": 2 }
        });
        let doc = render(&config(), false, Some(&cr));
        let spec = &doc["spec"];

        assert_eq!(spec["channel"], "regular");
        assert_eq!(spec["moduleName"], "template-operator");
        assert_eq!(spec["version"], "1.0.1");
        assert_eq!(spec["mandatory"], false);
        assert_eq!(spec["requiresDowntime"], false);
        assert_eq!(spec["info"]["icons"][0]["name"], "module-icon");
        assert_eq!(spec["associatedResources"][0]["kind"], "Sample");
        assert_eq!(spec["manager"]["name"], "template-operator-controller-manager");
        assert_eq!(spec["data"], cr);
        assert_eq!(spec["descriptor"]["meta"]["schemaVersion"], "v2");
    }

    #[test]
    fn test_resource_links_include_raw_manifest_url() {
        let doc = render(&config(), false, None);
        let links = doc["spec"]["resources"].as_array().unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0]["name"], "rawManifest");
        assert_eq!(links[0]["link"], "https://example.com/manifest.yaml");
        assert_eq!(links[1]["name"], "source");
    }

    #[test]
    fn test_optional_sections_omitted() {
        let mut config = config();
        config.channel = None;
        config.manager = None;
        config.associated_resources.clear();
        config.resources = Default::default();
        config.manifest = modpack_core::FileReference::parse("manifest.yaml");

        let doc = render(&config, false, None);
        let spec = doc["spec"].as_object().unwrap();
        for key in ["channel", "manager", "associatedResources", "data", "resources"] {
            assert!(!spec.contains_key(key), "{} should be omitted", key);
        }
    }
}
