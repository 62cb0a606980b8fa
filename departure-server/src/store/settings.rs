//! User settings file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{StoreError, write_json};
use crate::siri::Credential;

/// File name inside the data directory.
const FILE_NAME: &str = "settings.json";

/// Default auto-refresh period.
pub const DEFAULT_REFRESH_SECS: u64 = 60;

fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH_SECS
}

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Live-feed API token; empty when never set.
    #[serde(default)]
    pub api_token: String,

    /// Auto-refresh period in seconds.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by `settings.json` in `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(FILE_NAME))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load settings, falling back to defaults for anything unreadable.
    pub fn load(&self) -> Settings {
        let Ok(contents) = std::fs::read_to_string(&self.path) else {
            return Settings::default();
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring unreadable settings");
            Settings::default()
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        write_json(&self.path, settings)
    }

    /// Persist a new API token and make it current for live-feed calls.
    pub async fn save_token(
        &self,
        token: impl Into<String>,
        credential: &Credential,
    ) -> Result<(), StoreError> {
        let token = token.into();
        let mut settings = self.load();
        settings.api_token = token.clone();
        self.save(&settings)?;
        credential.set(token).await;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
