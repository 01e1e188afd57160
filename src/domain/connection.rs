//! Control-plane connection parameters.
//!
//! Resolved once at startup and threaded explicitly into every component
//! that needs them — never stored in process-wide state.

use std::sync::OnceLock;

use regex::Regex;

/// Plain environment variable holding the control-plane URL.
pub const ENV_URL: &str = "AGENTCI_URL";
/// Plain environment variable holding the API key.
pub const ENV_API_KEY: &str = "AGENTCI_API_KEY";
/// Plain environment variable holding the API secret.
pub const ENV_API_SECRET: &str = "AGENTCI_API_SECRET";

/// Connection parameters for the remote control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub url: String,
    pub api_key: String,
    pub api_secret: String,
}

impl ConnectionParams {
    /// The connection URL with a `ws(s)` scheme rewritten to `http(s)` and
    /// any trailing slash removed, suitable as an HTTP base URL.
    #[must_use]
    pub fn http_url(&self) -> String {
        let url = self.url.trim_end_matches('/');
        if let Some(rest) = url.strip_prefix("wss://") {
            return format!("https://{rest}");
        }
        if let Some(rest) = url.strip_prefix("ws://") {
            return format!("http://{rest}");
        }
        url.to_string()
    }
}

/// Extract the project subdomain from a control-plane URL: the host label
/// preceding the first `.` after the scheme.
///
/// Returns `None` when the URL has no recognized scheme or no dotted host.
#[must_use]
pub fn extract_subdomain(url: &str) -> Option<&str> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used)] // pattern is a literal, cannot fail
        Regex::new(r"^(?:https?|wss?)://([^.]+)\.").expect("valid subdomain pattern")
    });
    pattern
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
