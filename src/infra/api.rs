//! HTTP client for the remote agent-management control plane.
//!
//! JSON over HTTPS with basic auth; `ws(s)` connection URLs are rewritten
//! to `http(s)`. Secret values travel base64-encoded.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::application::ports::{ControlPlane, ProvisionedAgent};
use crate::domain::connection::ConnectionParams;
use crate::domain::secrets::SecretEntry;
use crate::domain::status::{AgentStatusReport, RegionalDeployment};

/// Client for the control plane's agent API.
pub struct HttpControlPlane {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

impl HttpControlPlane {
    /// Build a client from resolved connection parameters.
    #[must_use]
    pub fn new(conn: &ConnectionParams) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: conn.http_url(),
            api_key: conn.api_key.clone(),
            api_secret: conn.api_secret.clone(),
        }
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<reqwest::Response> {
        let response = request
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await
            .with_context(|| format!("control plane {operation} request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("control plane {operation} returned {status}: {body}");
        }
        Ok(response)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SecretWire<'a> {
    name: &'a str,
    /// base64 of the secret bytes
    value: String,
}

fn to_wire(secrets: &[SecretEntry]) -> Vec<SecretWire<'_>> {
    secrets
        .iter()
        .map(|entry| SecretWire {
            name: &entry.name,
            value: BASE64.encode(&entry.value),
        })
        .collect()
}

#[derive(Serialize)]
struct CreateAgentRequest<'a> {
    secrets: Vec<SecretWire<'a>>,
}

#[derive(Serialize)]
struct DeployAgentRequest<'a> {
    secrets: Vec<SecretWire<'a>>,
}

#[derive(Deserialize)]
struct ProvisionResponse {
    agent_id: String,
    presigned_url: String,
}

#[derive(Deserialize)]
struct ListAgentsResponse {
    #[serde(default)]
    agents: Vec<AgentWire>,
}

#[derive(Deserialize)]
struct AgentWire {
    agent_id: String,
    #[serde(default)]
    deployments: Vec<DeploymentWire>,
}

#[derive(Deserialize)]
struct DeploymentWire {
    region: String,
    status: String,
}

impl From<AgentWire> for AgentStatusReport {
    fn from(wire: AgentWire) -> Self {
        Self {
            agent_id: wire.agent_id,
            deployments: wire
                .deployments
                .into_iter()
                .map(|d| RegionalDeployment {
                    region: d.region,
                    status: d.status,
                })
                .collect(),
        }
    }
}

// ── Port implementation ───────────────────────────────────────────────────────

impl ControlPlane for HttpControlPlane {
    async fn create_agent(&self, secrets: &[SecretEntry]) -> Result<ProvisionedAgent> {
        let url = format!("{}/v1/agents", self.base_url);
        let body = CreateAgentRequest {
            secrets: to_wire(secrets),
        };
        let response = self.execute(self.http.post(&url).json(&body), "create").await?;
        let parsed: ProvisionResponse = response
            .json()
            .await
            .context("parsing create response")?;
        Ok(ProvisionedAgent {
            agent_id: parsed.agent_id,
            presigned_url: parsed.presigned_url,
        })
    }

    async fn deploy_agent(
        &self,
        agent_id: &str,
        secrets: &[SecretEntry],
    ) -> Result<ProvisionedAgent> {
        let url = format!("{}/v1/agents/{agent_id}/deploy", self.base_url);
        let body = DeployAgentRequest {
            secrets: to_wire(secrets),
        };
        let response = self.execute(self.http.post(&url).json(&body), "deploy").await?;
        let parsed: ProvisionResponse = response
            .json()
            .await
            .context("parsing deploy response")?;
        Ok(ProvisionedAgent {
            agent_id: parsed.agent_id,
            presigned_url: parsed.presigned_url,
        })
    }

    async fn list_agents(&self, agent_id: &str) -> Result<Vec<AgentStatusReport>> {
        let url = format!("{}/v1/agents", self.base_url);
        let response = self
            .execute(self.http.get(&url).query(&[("agent_id", agent_id)]), "list")
            .await?;
        let parsed: ListAgentsResponse = response.json().await.context("parsing list response")?;
        Ok(parsed.agents.into_iter().map(Into::into).collect())
    }

    async fn trigger_build(&self, agent_id: &str) -> Result<()> {
        let url = format!("{}/v1/agents/{agent_id}/build", self.base_url);
        self.execute(self.http.post(&url), "build").await?;
        Ok(())
    }
}
