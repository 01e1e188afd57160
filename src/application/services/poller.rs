//! Bounded status-poll loop for the `status-retry` operation.
//!
//! Single-dimensioned state machine: unhealthy readings, zero-agent
//! listings and transport errors all count against one timeout budget, so
//! total wall-clock time polling is bounded by the timeout regardless of
//! failure mode. The inter-tick wait is cancellable.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::application::ports::ControlPlane;
use crate::domain::status::{AgentHealth, AgentStatusReport};

/// Default inter-tick wait. Kept at several seconds so the loop never
/// hammers the control plane.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Timing parameters of the poll loop.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Total wall-clock budget before the verdict is [`PollVerdict::TimedOut`].
    pub timeout: Duration,
    /// Fixed wait between ticks.
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Terminal state of the poll loop.
#[derive(Debug)]
pub enum PollVerdict {
    /// Every regional deployment reported the running label.
    Healthy(AgentStatusReport),
    /// The timeout budget elapsed; carries the last observation made.
    TimedOut(Observation),
    /// The cancellation token fired between ticks.
    Cancelled,
}

/// What one tick of the loop saw.
#[derive(Debug)]
pub enum Observation {
    Unhealthy(AgentStatusReport),
    /// The control plane listed zero agents for the id. Possibly transient
    /// right after a build is triggered, so it is retried like any other
    /// unhealthy reading.
    Gone,
    TransportError(String),
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unhealthy(report) => match report.health() {
                AgentHealth::Unhealthy { region, status } => {
                    write!(f, "region '{region}' reports '{status}'")
                }
                AgentHealth::Healthy => write!(f, "healthy"),
            },
            Self::Gone => write!(f, "agent not listed by the control plane"),
            Self::TransportError(message) => write!(f, "query failed: {message}"),
        }
    }
}

/// Poll the agent's status until healthy, timed out, or cancelled.
///
/// Returns [`PollVerdict::Healthy`] immediately on the first tick where
/// aggregation succeeds. Otherwise the loop re-checks elapsed time after
/// every tick and waits one interval, observing `cancel` during the wait.
pub async fn poll_until_running(
    api: &impl ControlPlane,
    agent_id: &str,
    config: &PollerConfig,
    cancel: &CancellationToken,
) -> PollVerdict {
    let started = Instant::now();

    loop {
        if cancel.is_cancelled() {
            return PollVerdict::Cancelled;
        }

        let observation = match api.list_agents(agent_id).await {
            Ok(agents) => match agents.into_iter().next() {
                Some(report) => match report.health() {
                    AgentHealth::Healthy => return PollVerdict::Healthy(report),
                    AgentHealth::Unhealthy { .. } => Observation::Unhealthy(report),
                },
                None => Observation::Gone,
            },
            Err(error) => Observation::TransportError(format!("{error:#}")),
        };

        tracing::debug!(
            agent_id,
            observation = %observation,
            elapsed_secs = started.elapsed().as_secs(),
            "agent not healthy yet"
        );

        if started.elapsed() >= config.timeout {
            return PollVerdict::TimedOut(observation);
        }

        tokio::select! {
            () = cancel.cancelled() => return PollVerdict::Cancelled,
            () = tokio::time::sleep(config.interval) => {}
        }
    }
}
