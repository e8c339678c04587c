//! User settings (`config.yaml`)
//!
//! Settings live in `<config_dir>/config.yaml`, where the directory comes from
//! [`crate::paths::config_dir`]. A missing file means defaults.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LauncherError, Result};
use crate::paths;

/// Settings file name inside the configuration directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Assistant executable launched when none is configured
pub const DEFAULT_ASSISTANT: &str = "claude";

/// Persisted user settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selected model identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API endpoint exported to the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Assistant executable name or path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant: Option<String>,

    /// Cached catalog of model identifiers offered by the picker
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
}

impl Settings {
    /// Parse settings from a YAML string. An empty document is all defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(yaml)?;
        Ok(settings)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn assistant(&self) -> &str {
        self.assistant.as_deref().unwrap_or(DEFAULT_ASSISTANT)
    }

    pub fn get(&self, key: SettingKey) -> Option<String> {
        match key {
            SettingKey::Model => self.model.clone(),
            SettingKey::BaseUrl => self.base_url.clone(),
            SettingKey::ApiKey => self.api_key.clone(),
            SettingKey::Assistant => Some(self.assistant().to_string()),
            SettingKey::Models => (!self.models.is_empty()).then(|| self.models.join(",")),
        }
    }

    /// Set `key`. `models` takes a comma-separated list.
    pub fn set(&mut self, key: SettingKey, value: &str) {
        let value = value.trim();
        match key {
            SettingKey::Model => self.model = Some(value.to_string()),
            SettingKey::BaseUrl => self.base_url = Some(value.to_string()),
            SettingKey::ApiKey => self.api_key = Some(value.to_string()),
            SettingKey::Assistant => self.assistant = Some(value.to_string()),
            SettingKey::Models => {
                self.models = value
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect();
            }
        }
    }

    pub fn unset(&mut self, key: SettingKey) {
        match key {
            SettingKey::Model => self.model = None,
            SettingKey::BaseUrl => self.base_url = None,
            SettingKey::ApiKey => self.api_key = None,
            SettingKey::Assistant => self.assistant = None,
            SettingKey::Models => self.models.clear(),
        }
    }
}

/// Names accepted by `modelgate config`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Model,
    BaseUrl,
    ApiKey,
    Assistant,
    Models,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::Model,
        SettingKey::BaseUrl,
        SettingKey::ApiKey,
        SettingKey::Assistant,
        SettingKey::Models,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Model => "model",
            SettingKey::BaseUrl => "base_url",
            SettingKey::ApiKey => "api_key",
            SettingKey::Assistant => "assistant",
            SettingKey::Models => "models",
        }
    }

    /// Whether the value should be masked when listed
    pub fn is_secret(self) -> bool {
        self == SettingKey::ApiKey
    }
}

impl FromStr for SettingKey {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| LauncherError::UnknownSetting { key: s.to_string() })
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads and writes the settings file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Store in the user's configuration directory
    pub fn open() -> Result<Self> {
        Ok(Self::in_dir(paths::config_dir()?))
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn load(&self) -> Result<Settings> {
        let path = self.path();
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| LauncherError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Settings::from_yaml(&content).map_err(|e| match e {
            LauncherError::ConfigParseFailed { reason, .. } => LauncherError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Write `settings`, leaving the file alone when nothing changed
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let path = self.path();
        let content = settings.to_yaml()?;
        if fs::read_to_string(&path).is_ok_and(|existing| existing == content) {
            return Ok(());
        }

        let write_failed = |e: std::io::Error| LauncherError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        fs::create_dir_all(&self.dir).map_err(write_failed)?;
        fs::write(&path, content).map_err(write_failed)?;
        debug!(path = %path.display(), "saved settings");
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let key: SettingKey = key.parse()?;
        Ok(self.load()?.get(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let key: SettingKey = key.parse()?;
        let mut settings = self.load()?;
        settings.set(key, value);
        self.save(&settings)
    }

    pub fn unset(&self, key: &str) -> Result<()> {
        let key: SettingKey = key.parse()?;
        let mut settings = self.load()?;
        settings.unset(key);
        self.save(&settings)
    }

    /// Every setting with its current value
    pub fn list(&self) -> Result<Vec<(SettingKey, Option<String>)>> {
        let settings = self.load()?;
        Ok(SettingKey::ALL
            .into_iter()
            .map(|key| (key, settings.get(key)))
            .collect())
    }
}
