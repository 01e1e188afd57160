//! Secret collection from the process environment.
//!
//! Two sources feed one ordered collection: `SECRET_`-prefixed variables
//! (Source A) and the comma-delimited `SECRET_LIST` variable (Source B).
//! Splitting is strict — a list entry without `=` fails the whole
//! collection, producing no partial set.

use crate::domain::connection::{ENV_API_KEY, ENV_API_SECRET, ENV_URL};
use crate::domain::error::SecretError;

/// Reserved prefix marking an environment variable as a secret.
pub const SECRET_PREFIX: &str = "SECRET_";
/// Sentinel variable holding the delimited secret list; never itself a secret.
pub const SECRET_LIST_VAR: &str = "SECRET_LIST";

/// One named secret. Values are bytes; they are never logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretEntry {
    pub name: String,
    pub value: Vec<u8>,
}

/// The collected secret set plus any connection parameters seeded from the
/// reserved names in Source A. The reserved entries stay in `entries` too —
/// the agent runtime needs them as ordinary secrets.
#[derive(Debug, Default)]
pub struct CollectedSecrets {
    pub entries: Vec<SecretEntry>,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

/// Collect secrets from an environment snapshot.
///
/// Source A entries are sorted by name so request construction is
/// deterministic regardless of how the runner orders its environment;
/// Source B entries follow in list order. Duplicate names are preserved —
/// last-writer semantics belong to the control plane.
///
/// # Errors
///
/// Returns [`SecretError::Malformed`] if any `SECRET_LIST` entry lacks a
/// `=` separator.
pub fn collect(env: &[(String, String)]) -> Result<CollectedSecrets, SecretError> {
    let mut collected = CollectedSecrets::default();

    // Source A: prefixed variables, the list sentinel excluded.
    let mut prefixed: Vec<(&str, &str)> = env
        .iter()
        .filter(|(key, _)| key != SECRET_LIST_VAR)
        .filter_map(|(key, value)| {
            key.strip_prefix(SECRET_PREFIX)
                .map(|name| (name, value.as_str()))
        })
        .collect();
    prefixed.sort_by(|a, b| a.0.cmp(b.0));

    for (name, value) in prefixed {
        match name {
            ENV_URL => collected.url = Some(value.to_string()),
            ENV_API_KEY => collected.api_key = Some(value.to_string()),
            ENV_API_SECRET => collected.api_secret = Some(value.to_string()),
            _ => {}
        }
        collected.entries.push(SecretEntry {
            name: name.to_string(),
            value: value.as_bytes().to_vec(),
        });
    }

    // Source B: the delimited list, appended after Source A.
    let list = env
        .iter()
        .find(|(key, _)| key == SECRET_LIST_VAR)
        .map(|(_, value)| value.as_str())
        .unwrap_or_default();
    if !list.is_empty() {
        for entry in list.split(',') {
            let (name, value) = entry.split_once('=').ok_or_else(|| SecretError::Malformed {
                entry: entry.to_string(),
            })?;
            collected.entries.push(SecretEntry {
                name: name.to_string(),
                value: value.as_bytes().to_vec(),
            });
        }
    }

    Ok(collected)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
