//! The `status` and `status-retry` operations.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ControlPlane, DescriptorStore, Notifier};
use crate::domain::error::{AgentError, PollError};
use crate::domain::status::{AgentHealth, AgentStatusReport};

use super::poller::{poll_until_running, PollVerdict, PollerConfig};
use super::load_registered;

/// Fetch the status report for one agent id.
///
/// # Errors
///
/// Returns [`AgentError::NotFound`] when the control plane lists zero
/// agents for the id.
pub async fn fetch_report(
    api: &impl ControlPlane,
    agent_id: &str,
) -> Result<AgentStatusReport> {
    let agents = api
        .list_agents(agent_id)
        .await
        .context("listing agents on the control plane")?;
    agents.into_iter().next().ok_or_else(|| {
        AgentError::NotFound {
            id: agent_id.to_string(),
        }
        .into()
    })
}

/// Single-shot status check with cross-region aggregation.
///
/// On an unhealthy verdict a best-effort notification is sent and the
/// operation fails; on a healthy verdict the first regional deployment is
/// logged as representative.
///
/// # Errors
///
/// Fails when the descriptor or remote agent record is missing, the query
/// fails, or the agent is unhealthy.
pub async fn check_status(
    api: &impl ControlPlane,
    store: &impl DescriptorStore,
    notifier: Option<&impl Notifier>,
) -> Result<AgentStatusReport> {
    let descriptor = load_registered(store).await?;
    let report = fetch_report(api, &descriptor.agent.id).await?;

    match report.health() {
        AgentHealth::Healthy => {
            if let Some(rep) = report.representative() {
                tracing::info!(
                    agent_id = %report.agent_id,
                    region = %rep.region,
                    status = %rep.status,
                    "agent status"
                );
            }
            Ok(report)
        }
        AgentHealth::Unhealthy { region, status } => {
            let id = report.agent_id.clone();
            notify_best_effort(
                notifier,
                &format!("Agent {id} is not running: region {region} reports {status}"),
            )
            .await;
            Err(AgentError::NotRunning { id, region, status }.into())
        }
    }
}

/// `status-retry`: poll until healthy or the timeout elapses.
///
/// # Errors
///
/// Returns [`PollError::TimedOut`] (after a best-effort notification) when
/// the budget expires, and [`PollError::Cancelled`] on shutdown.
pub async fn wait_until_running(
    api: &impl ControlPlane,
    store: &impl DescriptorStore,
    notifier: Option<&impl Notifier>,
    config: &PollerConfig,
    cancel: &CancellationToken,
) -> Result<AgentStatusReport> {
    let descriptor = load_registered(store).await?;
    let id = descriptor.agent.id;
    let timeout = humantime::format_duration(config.timeout).to_string();
    tracing::info!(agent_id = %id, %timeout, "waiting for agent to become healthy");

    match poll_until_running(api, &id, config, cancel).await {
        PollVerdict::Healthy(report) => {
            tracing::info!(agent_id = %id, "agent is healthy");
            Ok(report)
        }
        PollVerdict::TimedOut(last) => {
            notify_best_effort(
                notifier,
                &format!("Agent {id} did not become healthy within {timeout}"),
            )
            .await;
            Err(PollError::TimedOut {
                id,
                timeout,
                last: last.to_string(),
            }
            .into())
        }
        PollVerdict::Cancelled => Err(PollError::Cancelled.into()),
    }
}

/// Send a notification if a sink is configured; log failures, never escalate.
pub(crate) async fn notify_best_effort(notifier: Option<&impl Notifier>, message: &str) {
    let Some(notifier) = notifier else {
        tracing::debug!("notification sink not configured, skipping");
        return;
    };
    match notifier.notify(message).await {
        Ok(()) => tracing::info!("notification sent"),
        Err(error) => {
            tracing::warn!(error = format!("{error:#}"), "failed to send notification");
        }
    }
}
