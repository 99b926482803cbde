//! On-disk module fixtures

use camino::Utf8PathBuf;
use std::path::Path;
use tempfile::TempDir;

pub const MODULE_VERSION: &str = "1.2.3";
pub const REPOSITORY: &str = "https://github.com/kyma-project/sample";
pub const MANAGER_IMAGE: &str = "europe-docker.pkg.dev/kyma-project/prod/sample-manager:1.2.3";
pub const SCANNER_IMAGE: &str = "europe-docker.pkg.dev/kyma-project/prod/sample-proxy:0.4.0";

pub fn manifest(manager_image: &str) -> String {
    format!(
        r#"apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: samples.operator.kyma-project.io
spec:
  group: operator.kyma-project.io
  names:
    kind: Sample
    plural: samples
  scope: Cluster
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: sample-manager
  namespace: kcp-system
spec:
  template:
    spec:
      containers:
        - name: manager
          image: {}
          env:
            - name: PROXY_IMAGE
              value: {}
"#,
        manager_image, SCANNER_IMAGE
    )
}

pub const DEFAULT_CR: &str = r#"apiVersion: operator.kyma-project.io/v1alpha1
kind: Sample
metadata:
  name: default
spec:
  replicas: 1
"#;

pub const SECURITY_CONFIG: &str = r#"module-name: sample
rc-tag: 1.2.3
dev-branch: main
bdba:
  - europe-docker.pkg.dev/kyma-project/prod/sample-manager:1.2.3
  - europe-docker.pkg.dev/kyma-project/prod/sample-scanner-helper:2.0.0
mend:
  language: golang-mod
  exclude:
    - "**/test/**"
"#;

/// module-config.yaml pointing at `manifest_ref`, with optional extras appended
pub fn module_config(manifest_ref: &str, extra: &str) -> String {
    format!(
        r#"name: kyma-project.io/module/sample
version: {}
channel: regular
manifest: {}
repository: {}
documentation: https://kyma-project.io/docs/sample
icons:
  - name: module-icon
    link: https://example.com/icon.png
manager:
  name: sample-manager
  namespace: kcp-system
  group: apps
  version: v1
  kind: Deployment
{}"#,
        MODULE_VERSION, manifest_ref, REPOSITORY, extra
    )
}

pub fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

/// A module directory with a local manifest, default CR and security config
pub fn local_module(manager_image: &str) -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "manifest.yaml", &manifest(manager_image));
    write(dir.path(), "default-cr.yaml", DEFAULT_CR);
    write(dir.path(), "sec-scanners-config.yaml", SECURITY_CONFIG);
    write(
        dir.path(),
        "module-config.yaml",
        &module_config(
            "manifest.yaml",
            "defaultCR: default-cr.yaml\nsecurity: sec-scanners-config.yaml\n",
        ),
    );
    let config_path = Utf8PathBuf::from_path_buf(dir.path().join("module-config.yaml")).unwrap();
    (dir, config_path)
}

/// Turn `dir` into a git repository with one commit and no remote.
///
/// Returns false when git is not installed.
pub fn init_git_repo(dir: &Path) -> bool {
    if which::which("git").is_err() {
        return false;
    }
    let git = |args: &[&str]| {
        let status = std::process::Command::new("git")
            .current_dir(dir)
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    };
    git(&["init", "-q"]);
    git(&[
        "-c",
        "user.name=test",
        "-c",
        "user.email=test@example.com",
        "commit",
        "-q",
        "--allow-empty",
        "-m",
        "init",
    ]);
    true
}

/// Files in the system temp dir whose names start with `prefix`
pub fn temp_files_with_prefix(prefix: &str) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(std::env::temp_dir())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy().starts_with(prefix))
                .unwrap_or(false)
        })
        .collect()
}
