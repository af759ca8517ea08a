use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const BASE_URL_ENV: &str = "REELVIEW_API_BASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Could not determine config path")]
    NoConfigDir,
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed settings file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Catalog base URL is not configured")]
    Missing,
    #[error("Invalid catalog base URL: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppSettings {
    pub api_base_url: String,
}

impl AppSettings {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "reelview").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Reads the settings file from the platform config directory.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_error)
    }

    /// Environment first (`.env` honoured), then the config file.
    pub fn resolve() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        let from_env = std::env::var(BASE_URL_ENV).ok();
        let path = Self::config_path();
        Self::resolve_from(from_env, path.as_deref())
    }

    fn resolve_from(from_env: Option<String>, file: Option<&Path>) -> Result<Self, SettingsError> {
        let settings = match from_env.filter(|value| !value.trim().is_empty()) {
            Some(url) => {
                tracing::debug!(source = BASE_URL_ENV, "using catalog base URL from environment");
                Self::new(url.trim())
            }
            None => match file {
                Some(path) if path.exists() => Self::load_from(path)?,
                _ => return Err(SettingsError::Missing),
            },
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let raw = self.api_base_url.trim();
        if raw.is_empty() {
            return Err(SettingsError::Missing);
        }
        let url = url::Url::parse(raw).map_err(|e| SettingsError::Invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(SettingsError::Invalid(format!("unsupported scheme '{other}'"))),
        }
    }
}
