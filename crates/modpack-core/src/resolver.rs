//! Resolution of local-or-remote references to local files
//!
//! Remote references are downloaded into temporary files owned by the
//! resolver. Those files live until [`FileResolver::cleanup_temp_files`] runs
//! (or the resolver is dropped), so later pipeline stages can read them by
//! path.

use crate::error::{Error, Result};
use crate::types::{FileReference, PackagerSettings};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Resolves [`FileReference`]s to concrete local paths
#[derive(Debug)]
pub struct FileResolver {
    client: reqwest::Client,
    temp_file_prefix: String,
    temp_files: Vec<PathBuf>,
}

impl FileResolver {
    /// Create a resolver using the network and naming settings
    pub fn new(settings: &PackagerSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&settings.network.user_agent)
            .timeout(Duration::from_secs(settings.network.download_timeout_secs))
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Self {
            client,
            temp_file_prefix: settings.naming.temp_file_prefix.clone(),
            temp_files: Vec::new(),
        })
    }

    /// Resolve `reference` to a local file.
    ///
    /// Relative local paths are joined onto `base_dir` unless it is empty.
    /// URLs are downloaded to a fresh temp file on every call.
    pub async fn resolve(
        &mut self,
        reference: &FileReference,
        base_dir: &Path,
    ) -> Result<PathBuf> {
        if reference.is_empty() {
            return Err(Error::EmptyReference);
        }

        if let Some(url) = reference.url() {
            return self.download(url).await;
        }

        let path = Path::new(reference.as_str());
        let path = if path.is_relative() && !base_dir.as_os_str().is_empty() {
            base_dir.join(path)
        } else {
            path.to_path_buf()
        };

        match path.try_exists() {
            Ok(true) => {
                debug!("Resolved {} to local file {}", reference, path.display());
                Ok(path)
            }
            Ok(false) => Err(Error::file_not_found(path.display().to_string())),
            Err(e) => Err(Error::existence_check_failed(path.display().to_string(), e)),
        }
    }

    async fn download(&mut self, url: &Url) -> Result<PathBuf> {
        debug!("Downloading {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::download_failed(url.as_str(), e))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::download_failed(url.as_str(), e))?;

        let path = self.create_temp_file()?;
        tokio::fs::write(&path, &body).await?;

        debug!("Downloaded {} ({} bytes) to {}", url, body.len(), path.display());
        Ok(path)
    }

    /// Create an empty, tracked temp file
    fn create_temp_file(&mut self) -> Result<PathBuf> {
        let path = tempfile::Builder::new()
            .prefix(&self.temp_file_prefix)
            .tempfile()?
            .into_temp_path()
            .keep()
            .map_err(|e| Error::Io(e.error))?;
        self.temp_files.push(path.clone());
        Ok(path)
    }

    /// Temp files created so far and not yet cleaned up
    pub fn temp_files(&self) -> &[PathBuf] {
        &self.temp_files
    }

    /// Delete every temp file this resolver created.
    ///
    /// Best effort: every file is attempted and all deletion errors are
    /// returned. Files are forgotten after the attempt, so a second call is a
    /// no-op.
    pub fn cleanup_temp_files(&mut self) -> Vec<std::io::Error> {
        let mut errors = Vec::new();
        for path in self.temp_files.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed temp file {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => errors.push(std::io::Error::new(
                    e.kind(),
                    format!("failed to remove {}: {}", path.display(), e),
                )),
            }
        }
        errors
    }
}

impl Drop for FileResolver {
    fn drop(&mut self) {
        for err in self.cleanup_temp_files() {
            warn!("Temp file cleanup failed: {}", err);
        }
    }
}
