//! Workspace packaging and presigned upload.
//!
//! The working directory is packed into a gzipped tarball. The agent
//! descriptor is excluded from the directory walk and appended separately
//! afterwards, so the archive always carries the version saved earlier in
//! the same invocation. `.git` directories are skipped.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::header::CONTENT_TYPE;

use crate::application::ports::ArtifactUploader;
use crate::domain::descriptor::DESCRIPTOR_FILE;

/// Uploads gzipped workspace tarballs to presigned targets.
#[derive(Default)]
pub struct PresignedUploader {
    http: reqwest::Client,
}

impl PresignedUploader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactUploader for PresignedUploader {
    async fn upload_workdir(&self, dir: &Path, presigned_url: &str) -> Result<()> {
        let dir = dir.to_path_buf();
        let payload = tokio::task::spawn_blocking(move || pack_workdir(&dir))
            .await
            .context("packaging task panicked")??;

        tracing::info!(bytes = payload.len(), "uploading workspace tarball");
        let response = self
            .http
            .put(presigned_url)
            .header(CONTENT_TYPE, "application/gzip")
            .body(payload)
            .send()
            .await
            .context("artifact upload request failed")?;
        anyhow::ensure!(
            response.status().is_success(),
            "artifact upload returned {}",
            response.status()
        );
        Ok(())
    }
}

/// Pack `dir` into an in-memory gzipped tarball, applying the descriptor
/// exclusion rule.
///
/// # Errors
///
/// Returns an error if the directory cannot be walked or read.
pub fn pack_workdir(dir: &Path) -> Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    append_dir(&mut builder, dir, &PathBuf::new())?;

    let descriptor = dir.join(DESCRIPTOR_FILE);
    if descriptor.exists() {
        builder
            .append_path_with_name(&descriptor, DESCRIPTOR_FILE)
            .context("archiving agent descriptor")?;
    }

    let encoder = builder.into_inner().context("finalizing tar archive")?;
    encoder.finish().context("finalizing gzip stream")
}

fn append_dir<W: Write>(builder: &mut tar::Builder<W>, root: &Path, rel: &Path) -> Result<()> {
    let current = root.join(rel);
    let entries =
        std::fs::read_dir(&current).with_context(|| format!("reading {}", current.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {}", current.display()))?;
        let name = entry.file_name();

        if name == ".git" {
            continue;
        }
        // Exclusion rule: the descriptor is appended separately by the caller.
        if rel.as_os_str().is_empty() && name == DESCRIPTOR_FILE {
            continue;
        }

        let rel_path = rel.join(&name);
        let file_type = entry
            .file_type()
            .with_context(|| format!("inspecting {}", entry.path().display()))?;

        if file_type.is_dir() {
            append_dir(builder, root, &rel_path)?;
        } else if file_type.is_file() {
            builder
                .append_path_with_name(entry.path(), &rel_path)
                .with_context(|| format!("archiving {}", rel_path.display()))?;
        }
        // sockets, fifos and symlinks are skipped
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
