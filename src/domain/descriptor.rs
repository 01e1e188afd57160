//! The per-working-directory agent descriptor.
//!
//! A descriptor links a working directory to its agent's identity on the
//! control plane. The current schema nests identity under `[project]` and
//! `[agent]` tables; a legacy schema stored flat `project_subdomain` and
//! `regions` fields and must stay readable. Legacy records are migrated in
//! memory on load and only rewritten on the next explicit save.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name of the descriptor inside the working directory.
pub const DESCRIPTOR_FILE: &str = "agentci.toml";

/// Persisted agent descriptor (current schema).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub project: ProjectSection,
    #[serde(default)]
    pub agent: AgentSection,
}

/// `[project]` table: control-plane tenant identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSection {
    pub subdomain: String,
}

/// `[agent]` table: the agent's opaque id and configured regions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSection {
    #[serde(default)]
    pub id: String,
    /// Empty means "use the control plane's default regions".
    #[serde(default)]
    pub regions: Vec<String>,
}

/// Deprecated flat schema, kept readable for migration.
#[derive(Debug, Deserialize)]
struct LegacyDescriptor {
    project_subdomain: String,
    #[serde(default)]
    regions: Vec<String>,
}

impl AgentDescriptor {
    /// A fresh descriptor for the given subdomain, with no agent id and
    /// default regions.
    #[must_use]
    pub fn new(subdomain: impl Into<String>) -> Self {
        Self {
            project: ProjectSection {
                subdomain: subdomain.into(),
            },
            agent: AgentSection::default(),
        }
    }

    /// Whether this descriptor records a successfully created agent.
    /// Migrated legacy records have an empty id and return `false`.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        !self.agent.id.is_empty()
    }

    /// Parse a descriptor document, attempting the current schema first
    /// and falling back to the legacy flat schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the text parses under neither schema.
    pub fn parse(text: &str) -> Result<Self> {
        match toml::from_str::<Self>(text) {
            Ok(descriptor) => Ok(descriptor),
            Err(current_err) => {
                let legacy: LegacyDescriptor = toml::from_str(text)
                    .map_err(|_| current_err)
                    .context("descriptor matches neither the current nor the legacy schema")?;
                Ok(Self {
                    project: ProjectSection {
                        subdomain: legacy.project_subdomain,
                    },
                    agent: AgentSection {
                        id: String::new(),
                        regions: legacy.regions,
                    },
                })
            }
        }
    }

    /// Serialize to the current TOML schema.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("serializing agent descriptor")
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
