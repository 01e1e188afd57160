//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator. Remote-call and filesystem
//! failures are not enumerated here; they propagate as contextual
//! `anyhow` chains from the infra layer.

use thiserror::Error;

// ── Configuration errors ──────────────────────────────────────────────────────

/// Errors in connection-parameter resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "control plane connection is not configured: set SECRET_AGENTCI_URL, \
         SECRET_AGENTCI_API_KEY and SECRET_AGENTCI_API_SECRET (or the plain \
         AGENTCI_* variables), or add a default project to the CLI settings"
    )]
    MissingConnection,

    #[error("cannot derive a project subdomain from '{0}'")]
    InvalidUrl(String),
}

// ── Secret errors ─────────────────────────────────────────────────────────────

/// Errors while collecting secrets from the environment.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("malformed secret entry '{entry}': expected NAME=VALUE")]
    Malformed { entry: String },
}

// ── Agent errors ──────────────────────────────────────────────────────────────

/// Errors related to the agent descriptor and remote agent records.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no agent descriptor found in '{dir}'. Run the create operation first.")]
    DescriptorNotFound { dir: String },

    #[error("descriptor in '{dir}' has no agent id. Run the create operation first.")]
    NotRegistered { dir: String },

    #[error("agent '{id}' not found on the control plane")]
    NotFound { id: String },

    #[error("agent '{id}' is not running: region '{region}' reports '{status}'")]
    NotRunning {
        id: String,
        region: String,
        status: String,
    },
}

// ── Settings errors ───────────────────────────────────────────────────────────

/// Errors related to the CLI-wide settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("project not found in CLI settings: {0}")]
    ProjectNotFound(String),
}

// ── Poller errors ─────────────────────────────────────────────────────────────

/// Terminal failures of the bounded status-poll loop.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("agent '{id}' did not become healthy within {timeout} (last observation: {last})")]
    TimedOut {
        id: String,
        timeout: String,
        last: String,
    },

    #[error("status polling cancelled by shutdown signal")]
    Cancelled,
}
