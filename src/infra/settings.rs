//! CLI-wide project settings stored in `~/.agentci/config.yaml`.
//!
//! The settings file holds named project records with credentials, so it
//! is persisted with owner-only permissions and a warning is emitted when
//! an existing file is readable by anyone else. An invocation that never
//! mutates settings must not create the file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::connection::extract_subdomain;
use crate::domain::error::SettingsError;

/// Environment variable overriding the settings file path (test hook).
pub const SETTINGS_PATH_VAR: &str = "AGENTCI_CONFIG";

/// One named project with its control-plane credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub name: String,
    pub url: String,
    pub api_key: String,
    pub api_secret: String,
}

/// The settings document: a project list with one optional default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    pub default_project: String,
    pub projects: Vec<ProjectSettings>,
    pub device_name: String,

    // absent from YAML
    #[serde(skip)]
    persisted: bool,
    #[serde(skip)]
    path: PathBuf,
}

impl CliSettings {
    /// Load the settings file from its default location, returning empty
    /// settings (without creating a file) when none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or an
    /// existing file cannot be read or parsed.
    pub fn load_or_create() -> Result<Self> {
        Self::load_from(default_path()?)
    }

    /// Load settings from an explicit path (used in tests).
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path,
                ..Self::default()
            });
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = std::fs::metadata(&path)
                .with_context(|| format!("inspecting {}", path.display()))?;
            if metadata.permissions().mode() & 0o077 != 0 {
                // the file holds credentials
                tracing::warn!(
                    path = %path.display(),
                    "settings file should have permissions 600"
                );
            }
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        let mut settings: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        settings.persisted = true;
        settings.path = path;
        Ok(settings)
    }

    /// Write the settings back if there is anything worth persisting: a
    /// file that never existed is not created for empty settings.
    ///
    /// # Errors
    ///
    /// Returns an error on serialization or filesystem failure.
    pub fn persist_if_needed(&self) -> Result<()> {
        if self.projects.is_empty() && !self.persisted {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(self).context("serializing settings")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("writing settings {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("setting permissions on {}", self.path.display()))?;
        }

        tracing::info!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// The project marked as default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ProjectNotFound`] when no default is set or
    /// the named default is missing from the list.
    pub fn default_project(&self) -> Result<&ProjectSettings> {
        if self.default_project.is_empty() {
            return Err(SettingsError::ProjectNotFound("no default project set".to_string()).into());
        }
        self.project_by_name(&self.default_project)
    }

    /// Look up a project by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ProjectNotFound`] on no match.
    pub fn project_by_name(&self, name: &str) -> Result<&ProjectSettings> {
        self.projects
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| SettingsError::ProjectNotFound(name.to_string()).into())
    }

    /// Look up a project whose URL carries the given subdomain.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ProjectNotFound`] on no match.
    pub fn project_by_subdomain(&self, subdomain: &str) -> Result<&ProjectSettings> {
        if subdomain.is_empty() {
            return Err(SettingsError::ProjectNotFound("empty subdomain".to_string()).into());
        }
        self.projects
            .iter()
            .find(|p| extract_subdomain(&p.url) == Some(subdomain))
            .ok_or_else(|| SettingsError::ProjectNotFound(subdomain.to_string()).into())
    }

    /// Whether a project with this name exists. Names are unique
    /// case-insensitively.
    #[must_use]
    pub fn project_exists(&self, name: &str) -> bool {
        self.projects.iter().any(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Remove a project by name, clearing the default if it pointed at the
    /// removed entry, and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error on filesystem failure.
    pub fn remove_project(&mut self, name: &str) -> Result<()> {
        self.projects.retain(|p| p.name != name);
        if self.default_project == name {
            self.default_project.clear();
        }
        self.persist_if_needed()
    }
}

/// `~/.agentci/config.yaml`, unless overridden by `AGENTCI_CONFIG`.
fn default_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(SETTINGS_PATH_VAR) {
        return Ok(PathBuf::from(path));
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".agentci").join("config.yaml"))
}
