//! Mock collaborators

use async_trait::async_trait;
use modpack_builder::{
    ArchivePublisher, ComponentDescriptor, Error, GitMetadata, LocalBlob, Result,
};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const COMMIT: &str = "0123456789abcdef0123456789abcdef01234567";

/// Git metadata with fixed answers
pub struct FakeGit;

#[async_trait]
impl GitMetadata for FakeGit {
    async fn latest_commit(&self, _repo: &Path) -> Result<String> {
        Ok(COMMIT.to_string())
    }
}

/// Publisher that records what it was asked to publish and checks the blobs exist
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    pub published: Arc<Mutex<Vec<(String, Vec<LocalBlob>)>>>,
}

#[async_trait]
impl ArchivePublisher for RecordingPublisher {
    async fn publish(&self, descriptor: &ComponentDescriptor, blobs: &[LocalBlob]) -> Result<()> {
        for blob in blobs {
            assert!(blob.path.exists(), "blob {} missing at publish time", blob.resource);
        }
        self.published
            .lock()
            .unwrap()
            .push((descriptor.name.clone(), blobs.to_vec()));
        Ok(())
    }
}

/// Publisher whose upload always fails with an I/O error
pub struct UnreachableRegistry;

#[async_trait]
impl ArchivePublisher for UnreachableRegistry {
    async fn publish(&self, _descriptor: &ComponentDescriptor, _blobs: &[LocalBlob]) -> Result<()> {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "registry refused the connection",
        )))
    }
}
