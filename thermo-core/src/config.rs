use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{error::WidgetError, model::Range};

pub const DEFAULT_YQL_URL: &str = "https://query.yahooapis.com/v1/public/yql";
pub const DEFAULT_FORECAST_FEED_URL: &str = "https://weather.yahooapis.com/forecastrss";
pub const DEFAULT_REVERSE_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Unit preference sent to the weather feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    /// One-letter code the feed expects in its `u` parameter.
    pub fn code(&self) -> &'static str {
        match self {
            Unit::Celsius => "c",
            Unit::Fahrenheit => "f",
        }
    }
}

/// Gauge bounds as stored on disk. Kept separate from [`Range`] so a bad
/// config file surfaces as a validation error, not a deserialization one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RangeConfig {
    pub max: f64,
    pub min: f64,
    pub step: f64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        // The demo page's gauge attributes.
        Self {
            max: 40.0,
            min: -10.0,
            step: 10.0,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// yql_url = "https://query.yahooapis.com/v1/public/yql"
/// unit = "celsius"
///
/// [range]
/// max = 40.0
/// min = -10.0
/// step = 10.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint answering both the places and the rss queries.
    pub yql_url: String,
    /// Feed the rss query wraps; the WOEID and unit are appended to it.
    pub forecast_feed_url: String,
    /// Endpoint for the coordinates-to-name lookup.
    pub reverse_geocode_url: String,
    pub unit: Unit,
    pub range: RangeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            yql_url: DEFAULT_YQL_URL.to_string(),
            forecast_feed_url: DEFAULT_FORECAST_FEED_URL.to_string(),
            reverse_geocode_url: DEFAULT_REVERSE_GEOCODE_URL.to_string(),
            unit: Unit::default(),
            range: RangeConfig::default(),
        }
    }
}

impl Config {
    /// Validated gauge range from the stored bounds.
    pub fn range(&self) -> Result<Range, WidgetError> {
        Range::new(self.range.max, self.range.min, self.range.step)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "thermo-widget", "thermo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
