//! TOML-backed implementation of the `DescriptorStore` port.
//!
//! Saves use atomic write (temp file + rename) so a partial write can
//! never produce a file that parses to a different agent id than intended.
//! File I/O runs on `tokio::task::spawn_blocking`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::DescriptorStore;
use crate::domain::descriptor::{AgentDescriptor, DESCRIPTOR_FILE};

/// Descriptor file manager bound to one working directory.
pub struct TomlDescriptorStore {
    dir: PathBuf,
    path: PathBuf,
}

impl TomlDescriptorStore {
    /// Create a store for the descriptor inside `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(DESCRIPTOR_FILE);
        Self { dir, path }
    }

    /// Synchronous load — used internally via `spawn_blocking`.
    fn load_sync(&self) -> Result<Option<AgentDescriptor>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading descriptor {}", self.path.display()))?;
        let descriptor = AgentDescriptor::parse(&content)
            .with_context(|| format!("parsing descriptor {}", self.path.display()))?;
        Ok(Some(descriptor))
    }

    /// Synchronous save — used internally via `spawn_blocking`.
    fn save_sync(&self, descriptor: &AgentDescriptor) -> Result<()> {
        let content = descriptor.to_toml()?;

        let temp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("finalizing descriptor {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), "descriptor saved");
        Ok(())
    }
}

impl DescriptorStore for TomlDescriptorStore {
    async fn load(&self) -> Result<Option<AgentDescriptor>> {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || TomlDescriptorStore::new(dir).load_sync())
            .await
            .context("descriptor load task panicked")?
    }

    async fn save(&self, descriptor: &AgentDescriptor) -> Result<()> {
        let dir = self.dir.clone();
        let descriptor = descriptor.clone();
        tokio::task::spawn_blocking(move || TomlDescriptorStore::new(dir).save_sync(&descriptor))
            .await
            .context("descriptor save task panicked")?
    }

    fn dir(&self) -> &Path {
        &self.dir
    }
}
