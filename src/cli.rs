//! CLI argument parsing with clap derive.
//!
//! Every argument is backed by an `INPUT_*` environment variable — the
//! tool runs non-interactively inside CI, where flags are awkward and env
//! vars are the native input channel.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;

use crate::application::services::{create, deploy, poller, status};
use crate::domain::connection::{self, ConnectionParams, ENV_API_KEY, ENV_API_SECRET, ENV_URL};
use crate::domain::error::ConfigError;
use crate::domain::secrets::{self, CollectedSecrets};
use crate::infra::api::HttpControlPlane;
use crate::infra::descriptor_store::TomlDescriptorStore;
use crate::infra::git::GitPublisher;
use crate::infra::notify::SlackNotifier;
use crate::infra::settings::CliSettings;
use crate::infra::tarball::PresignedUploader;

/// CI orchestrator for cloud agent deployments
#[derive(Parser)]
#[command(name = "agentci", version)]
pub struct Cli {
    /// Lifecycle operation to run
    #[arg(long, env = "INPUT_OPERATION", value_enum)]
    pub operation: Operation,

    /// Directory containing (or receiving) the agent descriptor
    #[arg(long, env = "INPUT_WORKING_DIRECTORY", default_value = ".")]
    pub working_directory: PathBuf,

    /// How long status-retry waits for the agent to become healthy
    #[arg(long, env = "INPUT_TIMEOUT", default_value = "5m", value_parser = humantime::parse_duration)]
    pub timeout: Duration,
}

/// The closed set of lifecycle operations, decided once at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    Create,
    Deploy,
    Status,
    StatusRetry,
}

impl Cli {
    /// Execute the requested operation.
    ///
    /// # Errors
    ///
    /// Returns an error on any fatal condition: malformed secrets, missing
    /// connection parameters, missing descriptor or agent, remote call
    /// failure, unhealthy status, or poll timeout.
    pub async fn run(self) -> Result<()> {
        let env: Vec<(String, String)> = std::env::vars().collect();
        let collected = secrets::collect(&env)?;
        if collected.entries.is_empty() {
            tracing::info!("no secrets loaded");
        }
        for entry in &collected.entries {
            tracing::info!(secret = %entry.name, "loaded secret");
        }

        let conn = resolve_connection(&collected, &env)?;
        tracing::info!(
            operation = ?self.operation,
            path = %self.working_directory.display(),
            "running"
        );

        let api = HttpControlPlane::new(&conn);
        let store = TomlDescriptorStore::new(&self.working_directory);
        let uploader = PresignedUploader::new();
        let notifier = SlackNotifier::from_env();

        match self.operation {
            Operation::Create => {
                let subdomain = connection::extract_subdomain(&conn.url)
                    .ok_or_else(|| ConfigError::InvalidUrl(conn.url.clone()))?;
                let vcs = GitPublisher::from_env();
                create::create_agent(
                    &api,
                    &store,
                    &uploader,
                    vcs.as_ref(),
                    subdomain,
                    &collected.entries,
                )
                .await?;
            }
            Operation::Deploy => {
                deploy::deploy_agent(&api, &store, &uploader, &collected.entries).await?;
            }
            Operation::Status => {
                status::check_status(&api, &store, notifier.as_ref()).await?;
            }
            Operation::StatusRetry => {
                let cancel = CancellationToken::new();
                let guard = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        tracing::info!("received shutdown signal");
                        guard.cancel();
                    }
                });
                let config = poller::PollerConfig {
                    timeout: self.timeout,
                    ..poller::PollerConfig::default()
                };
                status::wait_until_running(&api, &store, notifier.as_ref(), &config, &cancel)
                    .await?;
            }
        }
        Ok(())
    }
}

/// Resolve connection parameters: reserved-prefixed secrets first, then the
/// plain environment, then the settings default project. The fallbacks are
/// wholesale — matching partial sets from different sources is never
/// attempted.
fn resolve_connection(
    collected: &CollectedSecrets,
    env: &[(String, String)],
) -> Result<ConnectionParams> {
    if let (Some(url), Some(api_key), Some(api_secret)) = (
        collected.url.clone(),
        collected.api_key.clone(),
        collected.api_secret.clone(),
    ) {
        return Ok(ConnectionParams {
            url,
            api_key,
            api_secret,
        });
    }

    let plain = |name: &str| {
        env.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .filter(|value| !value.is_empty())
    };
    if let (Some(url), Some(api_key), Some(api_secret)) =
        (plain(ENV_URL), plain(ENV_API_KEY), plain(ENV_API_SECRET))
    {
        return Ok(ConnectionParams {
            url,
            api_key,
            api_secret,
        });
    }

    let settings = CliSettings::load_or_create()?;
    if let Ok(project) = settings.default_project() {
        tracing::info!(project = %project.name, "using default project from CLI settings");
        return Ok(ConnectionParams {
            url: project.url.clone(),
            api_key: project.api_key.clone(),
            api_secret: project.api_secret.clone(),
        });
    }

    Err(ConfigError::MissingConnection.into())
}
