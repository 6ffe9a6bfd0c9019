use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    city::CityId,
    dashboard::RefreshPolicy,
    locale::Locale,
    retry::{DEFAULT_DELAY_MS, DEFAULT_RETRIES, RetryPolicy},
    scheduler::{DEFAULT_STATUS_EVERY, SchedulerConfig},
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "http://localhost:8080"
/// cities = ["zagreb", "split", "osijek"]
/// refresh_minutes = 15
/// refresh_policy = "last_viewed"
/// locale = "hr"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the weather backend is served from.
    pub base_url: String,

    /// Cards shown on the dashboard, in display order.
    pub cities: Vec<CityId>,

    pub refresh_minutes: u64,

    pub refresh_policy: RefreshPolicy,

    /// Retries after a failed request, and the pause before each one.
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,

    pub locale: Locale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cities: CityId::default_set().to_vec(),
            refresh_minutes: 15,
            refresh_policy: RefreshPolicy::default(),
            retry_attempts: DEFAULT_RETRIES,
            retry_delay_ms: DEFAULT_DELAY_MS,
            locale: Locale::default(),
        }
    }
}

impl Config {
    /// Load and validate the config file. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Like [`Config::load`], but a broken file is reported and replaced by
    /// defaults. Used where the user is about to rewrite the file anyway.
    pub fn load_or_default() -> Self {
        match Self::config_file_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(err) => {
                tracing::warn!("{err:#}; starting from defaults");
                Self::default()
            }
        }
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|err| {
            tracing::warn!("{err:#}; starting from defaults");
            Self::default()
        })
    }

    /// Parse TOML without validating; missing keys take their defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply per-run command-line overrides and check the result.
    pub fn with_overrides(mut self, base_url: Option<&str>, locale: Option<&str>) -> Result<Self> {
        if let Some(base_url) = base_url {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(locale) = locale {
            self.locale = Locale::try_from(locale)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate, then write to the platform config path.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate().context("Refusing to save an invalid configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.cities.is_empty() {
            bail!("Config lists no cities.\nHint: add e.g. `cities = [\"zagreb\", \"split\"]`.");
        }
        if self.refresh_minutes == 0 {
            bail!("refresh_minutes must be greater than 0");
        }
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        Ok(())
    }

    pub fn city_ids(&self) -> &[CityId] {
        &self.cities
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, self.retry_delay_ms)
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            refresh_every: Duration::from_secs(self.refresh_minutes.saturating_mul(60)),
            status_every: DEFAULT_STATUS_EVERY,
            policy: self.refresh_policy,
        }
    }
}
