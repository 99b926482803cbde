//! On-disk fixtures for configuration and manifest tests

use std::path::{Path, PathBuf};

pub const MODULE_NAME: &str = "kyma-project.io/module/sample";
pub const MODULE_VERSION: &str = "1.2.3";
pub const CR_GROUP: &str = "operator.kyma-project.io";
pub const CR_KIND: &str = "Sample";

/// Minimal valid module-config.yaml
pub fn minimal_module_config() -> String {
    format!(
        "name: {}\nversion: {}\nmanifest: manifest.yaml\n",
        MODULE_NAME, MODULE_VERSION
    )
}

/// Full module-config.yaml exercising every optional field
pub fn full_module_config() -> String {
    format!(
        r#"name: {name}
version: {version}
channel: regular
manifest: manifest.yaml
defaultCR: default-cr.yaml
security: sec-scanners-config.yaml
namespace: sample-system
mandatory: false
internal: true
beta: true
requiresDowntime: false
labels:
  team: sample
annotations:
  owner: sample-team
repository: https://github.com/kyma-project/sample
documentation: https://kyma-project.io/docs/sample
icons:
  - name: module-icon
    link: https://example.com/icon.png
resources:
  - name: source
    link: https://github.com/kyma-project/sample
manager:
  name: sample-manager
  namespace: sample-system
  group: apps
  version: v1
  kind: Deployment
associatedResources:
  - group: {group}
    version: v1alpha1
    kind: {kind}
"#,
        name = MODULE_NAME,
        version = MODULE_VERSION,
        group = CR_GROUP,
        kind = CR_KIND,
    )
}

/// A default custom resource of the sample kind
pub fn default_cr() -> String {
    format!(
        "apiVersion: {}/v1alpha1\nkind: {}\nmetadata:\n  name: default\nspec:\n  replicas: 1\n",
        CR_GROUP, CR_KIND
    )
}

/// A CRD document for `group`/`kind` with the given scope
pub fn crd(group: &str, kind: &str, scope: &str) -> String {
    format!(
        r#"apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: {plural}.{group}
spec:
  group: {group}
  names:
    kind: {kind}
    plural: {plural}
  scope: {scope}
"#,
        plural = format!("{}s", kind.to_lowercase()),
        group = group,
        kind = kind,
        scope = scope,
    )
}

/// Join documents into a multi-document YAML stream
pub fn multi_doc(documents: &[String]) -> String {
    documents.join("---\n")
}

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
