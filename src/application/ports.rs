//! Port trait definitions for the application layer.
//!
//! Ports are the contracts the infra layer must fulfill. This file imports
//! only from `crate::domain` — never from `crate::infra` or `crate::cli`.

use std::path::Path;

use anyhow::Result;

use crate::domain::descriptor::AgentDescriptor;
use crate::domain::secrets::SecretEntry;
use crate::domain::status::AgentStatusReport;

// ── Value types ───────────────────────────────────────────────────────────────

/// The control plane's answer to a create or deploy call: the agent's
/// opaque id and a presigned target for the workspace artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAgent {
    pub agent_id: String,
    pub presigned_url: String,
}

// ── Control plane port ────────────────────────────────────────────────────────

/// Remote agent-management operations.
#[allow(async_fn_in_trait)]
pub trait ControlPlane {
    /// Register a new agent, passing the collected secrets along.
    async fn create_agent(&self, secrets: &[SecretEntry]) -> Result<ProvisionedAgent>;
    /// Start a new deployment of an existing agent.
    async fn deploy_agent(&self, agent_id: &str, secrets: &[SecretEntry])
        -> Result<ProvisionedAgent>;
    /// List agents matching an id, with their per-region deployment statuses.
    async fn list_agents(&self, agent_id: &str) -> Result<Vec<AgentStatusReport>>;
    /// Trigger the remote build for an uploaded artifact.
    async fn trigger_build(&self, agent_id: &str) -> Result<()>;
}

// ── Artifact upload port ──────────────────────────────────────────────────────

/// Packages a working directory and ships it to a presigned upload target.
#[allow(async_fn_in_trait)]
pub trait ArtifactUploader {
    /// Upload `dir`'s contents to `presigned_url`. The agent descriptor is
    /// excluded from the directory walk and appended separately, so the
    /// archive always carries the just-saved version.
    async fn upload_workdir(&self, dir: &Path, presigned_url: &str) -> Result<()>;
}

// ── Notification port ─────────────────────────────────────────────────────────

/// Best-effort notification sink; callers log failures, never escalate them.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn notify(&self, message: &str) -> Result<()>;
}

// ── Descriptor store port ─────────────────────────────────────────────────────

/// Persistence of the per-working-directory agent descriptor.
#[allow(async_fn_in_trait)]
pub trait DescriptorStore {
    /// Load the descriptor, returning `Ok(None)` when no file exists.
    async fn load(&self) -> Result<Option<AgentDescriptor>>;
    /// Persist the descriptor atomically.
    async fn save(&self, descriptor: &AgentDescriptor) -> Result<()>;
    /// The working directory this store is bound to.
    fn dir(&self) -> &Path;
}

// ── Version control port ──────────────────────────────────────────────────────

/// Publishes the freshly created descriptor back to version control.
/// Invoked only by the create flow, and only when the caller's environment
/// enables it.
#[allow(async_fn_in_trait)]
pub trait VcsPublisher {
    async fn publish_descriptor(&self, dir: &Path) -> Result<()>;
}
