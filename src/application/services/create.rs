//! The `create` operation: register a new agent for a working directory.

use anyhow::{Context, Result};

use crate::application::ports::{ArtifactUploader, ControlPlane, DescriptorStore, VcsPublisher};
use crate::domain::descriptor::AgentDescriptor;
use crate::domain::secrets::SecretEntry;

/// How a create invocation concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A descriptor already existed; nothing was done and no remote call
    /// was made. The id is empty for migrated legacy records.
    AlreadyRegistered { agent_id: String },
    /// A new agent was registered, uploaded and queued for build.
    Created { agent_id: String },
}

/// Create a new agent: remote registration, descriptor persistence,
/// artifact upload, remote build, and an optional descriptor commit/push.
///
/// Idempotent at the directory level — an existing descriptor short-circuits
/// to success without contacting the control plane. A failure after the
/// descriptor is persisted but before the build succeeds leaves the
/// descriptor on disk; this inconsistency window is accepted and never
/// rolled back automatically.
///
/// # Errors
///
/// Any failing step aborts the remaining steps and is fatal for the
/// invocation.
pub async fn create_agent(
    api: &impl ControlPlane,
    store: &impl DescriptorStore,
    uploader: &impl ArtifactUploader,
    vcs: Option<&impl VcsPublisher>,
    subdomain: &str,
    secrets: &[SecretEntry],
) -> Result<CreateOutcome> {
    if let Some(existing) = store.load().await? {
        tracing::info!(
            path = %store.dir().display(),
            agent_id = %existing.agent.id,
            "descriptor already exists, skipping create"
        );
        return Ok(CreateOutcome::AlreadyRegistered {
            agent_id: existing.agent.id,
        });
    }

    let provisioned = api
        .create_agent(secrets)
        .await
        .context("creating agent on the control plane")?;
    tracing::info!(agent_id = %provisioned.agent_id, "agent registered");

    let mut descriptor = AgentDescriptor::new(subdomain);
    descriptor.agent.id = provisioned.agent_id.clone();
    store
        .save(&descriptor)
        .await
        .context("saving agent descriptor")?;

    uploader
        .upload_workdir(store.dir(), &provisioned.presigned_url)
        .await
        .context("uploading workspace artifact")?;

    api.trigger_build(&provisioned.agent_id)
        .await
        .context("triggering remote build")?;

    if let Some(vcs) = vcs {
        vcs.publish_descriptor(store.dir())
            .await
            .context("publishing descriptor to version control")?;
    }

    tracing::info!(agent_id = %provisioned.agent_id, "agent created");
    Ok(CreateOutcome::Created {
        agent_id: provisioned.agent_id,
    })
}
