//! The `deploy` operation: redeploy an already registered agent.

use anyhow::{Context, Result};

use crate::application::ports::{ArtifactUploader, ControlPlane, DescriptorStore};
use crate::domain::secrets::SecretEntry;

use super::load_registered;

/// Deploy the working directory's agent: remote deploy call, artifact
/// upload, remote build. Returns the agent id.
///
/// # Errors
///
/// Fails when no registered descriptor exists in the working directory, or
/// when any remote step fails.
pub async fn deploy_agent(
    api: &impl ControlPlane,
    store: &impl DescriptorStore,
    uploader: &impl ArtifactUploader,
    secrets: &[SecretEntry],
) -> Result<String> {
    let descriptor = load_registered(store).await?;

    let provisioned = api
        .deploy_agent(&descriptor.agent.id, secrets)
        .await
        .context("deploying agent on the control plane")?;

    uploader
        .upload_workdir(store.dir(), &provisioned.presigned_url)
        .await
        .context("uploading workspace artifact")?;

    api.trigger_build(&provisioned.agent_id)
        .await
        .context("triggering remote build")?;

    tracing::info!(agent_id = %provisioned.agent_id, "agent deployed");
    Ok(provisioned.agent_id)
}
