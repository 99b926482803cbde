//! Git metadata for the module's source repository

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Provides provenance information about a repository
#[async_trait]
pub trait GitMetadata: Send + Sync {
    /// Hash of the commit `HEAD` points at
    async fn latest_commit(&self, repo: &Path) -> Result<String>;
}

/// [`GitMetadata`] backed by the `git` command line
#[derive(Debug, Default, Clone)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    async fn git(&self, repo: &Path, args: &[&str]) -> Result<String> {
        which::which("git").map_err(|_| Error::GitNotFound)?;

        debug!("Running git {} in {}", args.join(" "), repo.display());
        let output = Command::new("git")
            .current_dir(repo)
            .args(args)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::git_operation(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl GitMetadata for GitCli {
    async fn latest_commit(&self, repo: &Path) -> Result<String> {
        let commit = self.git(repo, &["rev-parse", "HEAD"]).await?;
        if commit.is_empty() {
            return Err(Error::git_operation("git rev-parse HEAD returned no commit"));
        }
        Ok(commit)
    }
}
