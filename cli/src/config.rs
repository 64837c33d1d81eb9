//! Credential file handling for the CLI.
//!
//! Stores the session token in `$XDG_CONFIG_HOME/userdesk/credentials.toml` on Linux and the
//! platform config directory elsewhere. The file backs the business [`SessionStore`].
//!
//! [`SessionStore`]: userdesk_business::SessionStore

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use userdesk_business::{StorageError, TokenStorage};

/// Credential file contents.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Credentials {
    #[serde(default)]
    auth: AuthSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AuthSection {
    /// Saved bearer token
    token: Option<String>,
}

/// [`TokenStorage`] backed by a TOML file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at [`FileTokenStorage::default_path`].
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Get the credential file path.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join("userdesk").join("credentials.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Credentials, StorageError> {
        if !self.path.exists() {
            return Ok(Credentials::default());
        }
        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    fn write(&self, credentials: &Credentials) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(credentials)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.read()?.auth.token)
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        let mut credentials = self.read().unwrap_or_default();
        credentials.auth.token = Some(token.to_owned());
        self.write(&credentials)
    }

    fn remove(&self) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut credentials = self.read().unwrap_or_default();
        credentials.auth.token = None;
        self.write(&credentials)
    }
}
