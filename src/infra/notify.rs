//! Slack notification sink.
//!
//! Configured by `SLACK_TOKEN` and `SLACK_CHANNEL`; absence of either
//! silently disables notifications. Failures are the caller's to log —
//! this sink is always best-effort.

use anyhow::{Context, Result};

use crate::application::ports::Notifier;

/// Environment variable holding the bot token.
pub const TOKEN_VAR: &str = "SLACK_TOKEN";
/// Environment variable holding the target channel.
pub const CHANNEL_VAR: &str = "SLACK_CHANNEL";

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Posts messages to a Slack channel.
pub struct SlackNotifier {
    http: reqwest::Client,
    token: String,
    channel: String,
}

impl SlackNotifier {
    /// Build a notifier from the environment; `None` when the token or
    /// channel is unset, disabling notifications.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let token = std::env::var(TOKEN_VAR).ok().filter(|v| !v.is_empty())?;
        let channel = std::env::var(CHANNEL_VAR).ok().filter(|v| !v.is_empty())?;
        Some(Self {
            http: reqwest::Client::new(),
            token,
            channel,
        })
    }
}

impl Notifier for SlackNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let response = self
            .http
            .post(POST_MESSAGE_URL)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "channel": self.channel,
                "text": message,
            }))
            .send()
            .await
            .context("notification request failed")?;
        anyhow::ensure!(
            response.status().is_success(),
            "notification endpoint returned {}",
            response.status()
        );

        let body: serde_json::Value = response
            .json()
            .await
            .context("parsing notification response")?;
        anyhow::ensure!(
            body.get("ok").and_then(serde_json::Value::as_bool) == Some(true),
            "notification rejected: {}",
            body.get("error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error")
        );

        tracing::debug!(channel = %self.channel, "notification delivered");
        Ok(())
    }
}
