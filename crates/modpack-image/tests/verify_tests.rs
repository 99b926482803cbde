//! Integration tests for manager image version verification

mod common;

use common::*;
use modpack_core::types::{GroupVersionKind, Manager};
use modpack_core::ModuleConfig;
use modpack_image::{Error, ImageVersionVerifier};
use tempfile::TempDir;

fn config(version: &str) -> ModuleConfig {
    let mut config: ModuleConfig = serde_json::from_value(serde_json::json!({
        "name": "kyma-project.io/module/test",
        "version": version,
        "manifest": "manifest.yaml"
    }))
    .unwrap();
    config.manager = Some(Manager {
        name: "test-manager".to_string(),
        namespace: Some("kcp-system".to_string()),
        gvk: GroupVersionKind::new("apps", "v1", "Deployment"),
    });
    config
}

#[test]
fn test_verify_rendered_manifest() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(
        dir.path(),
        &[workload_yaml(
            "Deployment",
            "test-manager",
            &["repo/sidecar:0.1.0", "repo/test-manager:1.2.3"],
        )],
    );

    let verifier = ImageVersionVerifier::new();
    assert!(verifier.verify(&config("1.2.3"), &manifest).is_ok());

    let err = verifier.verify(&config("2.0.0"), &manifest).unwrap_err();
    match err {
        Error::NoMatchedVersion { manager, expected, found, .. } => {
            assert_eq!(manager, "test-manager");
            assert_eq!(expected, "2.0.0");
            assert_eq!(found, vec!["0.1.0".to_string(), "1.2.3".to_string()]);
        }
        other => panic!("Expected NoMatchedVersion, got: {:?}", other),
    }
}

#[test]
fn test_verify_missing_manifest() {
    let dir = TempDir::new().unwrap();
    let err = ImageVersionVerifier::new()
        .verify(&config("1.2.3"), &dir.path().join("absent.yaml"))
        .unwrap_err();
    assert!(matches!(err, Error::Core(modpack_core::Error::ManifestReadFailed { .. })));
}
