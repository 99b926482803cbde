//! Common test utilities for modpack-image

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const DIGEST: &str = "9c1d2e3f4a5b6c7d8e9f0a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0c1d";

/// A Deployment (or other workload kind) with the given container images
pub fn workload_yaml(kind: &str, name: &str, images: &[&str]) -> String {
    let containers: String = images
        .iter()
        .enumerate()
        .map(|(i, image)| format!("        - name: c{}\n          image: {}\n", i, image))
        .collect();
    format!(
        "apiVersion: apps/v1\nkind: {}\nmetadata:\n  name: {}\n\
         spec:\n  template:\n    spec:\n      containers:\n{}",
        kind, name, containers
    )
}

/// Write a multi-document manifest to `dir/manifest.yaml`
pub fn write_manifest(dir: &Path, documents: &[String]) -> PathBuf {
    let path = dir.join("manifest.yaml");
    std::fs::write(&path, documents.join("---\n")).unwrap();
    path
}
