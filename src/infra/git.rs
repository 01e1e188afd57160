//! Version-control publication of the agent descriptor.
//!
//! Used only by the create flow, and only when `GITHUB_TOKEN` is present
//! in the environment — CI checkouts already embed the token in the
//! remote, so the token's presence simply gates the step. No retries.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::VcsPublisher;
use crate::domain::descriptor::DESCRIPTOR_FILE;

/// Environment variable gating descriptor publication.
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Commits and pushes the descriptor with the ambient `git` binary.
pub struct GitPublisher;

impl GitPublisher {
    /// Build a publisher when `GITHUB_TOKEN` is set; `None` disables the
    /// publication step.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var(TOKEN_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .map(|_| Self)
    }
}

impl VcsPublisher for GitPublisher {
    async fn publish_descriptor(&self, dir: &Path) -> Result<()> {
        run_git(dir, &["add", DESCRIPTOR_FILE]).await?;
        run_git(dir, &["commit", "-m", "Add agent descriptor"]).await?;
        run_git(dir, &["push"]).await?;
        tracing::info!(path = %dir.display(), "descriptor pushed to version control");
        Ok(())
    }
}

async fn run_git(dir: &Path, args: &[&str]) -> Result<()> {
    let output = tokio::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .with_context(|| format!("spawning git {}", args[0]))?;
    anyhow::ensure!(
        output.status.success(),
        "git {} failed: {}",
        args[0],
        String::from_utf8_lossy(&output.stderr).trim()
    );
    Ok(())
}
