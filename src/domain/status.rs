//! Multi-region deployment status and its aggregation rule.
//!
//! An agent is healthy only when every regional deployment reports the
//! running label. Transient data — never persisted.

/// The status label a healthy regional deployment reports.
pub const RUNNING_STATUS: &str = "Running";

/// One regional deployment of an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionalDeployment {
    pub region: String,
    pub status: String,
}

/// The control plane's view of one agent across all its regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStatusReport {
    pub agent_id: String,
    pub deployments: Vec<RegionalDeployment>,
}

/// Aggregated health verdict for one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentHealth {
    Healthy,
    Unhealthy { region: String, status: String },
}

impl AgentStatusReport {
    /// Aggregate regional statuses into one verdict: unhealthy if any
    /// region differs from [`RUNNING_STATUS`]. An agent with no regional
    /// deployments is unhealthy — nothing is serving yet.
    #[must_use]
    pub fn health(&self) -> AgentHealth {
        if self.deployments.is_empty() {
            return AgentHealth::Unhealthy {
                region: "none".to_string(),
                status: "NoDeployments".to_string(),
            };
        }
        for deployment in &self.deployments {
            if deployment.status != RUNNING_STATUS {
                return AgentHealth::Unhealthy {
                    region: deployment.region.clone(),
                    status: deployment.status.clone(),
                };
            }
        }
        AgentHealth::Healthy
    }

    /// The first regional deployment, reported as representative when
    /// the agent is healthy.
    #[must_use]
    pub fn representative(&self) -> Option<&RegionalDeployment> {
        self.deployments.first()
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
