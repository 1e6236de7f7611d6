use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::Validate;

use crate::domain::csv::NumericPolicy;
use crate::domain::error::{AppError, Result};

pub const ENV_PREFIX: &str = "SUSTAINALYZE_";
pub const CONFIG_PATH_ENV: &str = "SUSTAINALYZE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "sustainalyze.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Base of the prediction API; requests go to `{base}/predict`
    #[validate(url)]
    pub prediction_base_url: String,
    /// Filesystem path or `http(s)` URL of the energy CSV
    #[validate(length(min = 1))]
    pub dataset: String,
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,
    pub strict_numeric: bool,
    pub thousands_separator: bool,
    /// Keep the parsed dataset between visualization activations
    pub cache_dataset: bool,
    #[validate(range(min = 1, max = 10000))]
    pub scatter_cap: usize,
    #[validate(range(min = 1, max = 10000))]
    pub trend_cap: usize,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            prediction_base_url: "http://localhost:5000/api".to_string(),
            dataset: "data/ENERGY_DATA_CLEANED.csv".to_string(),
            request_timeout_secs: 30,
            strict_numeric: false,
            thousands_separator: false,
            cache_dataset: false,
            scatter_cap: 50,
            trend_cap: 50,
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn numeric_policy(&self) -> NumericPolicy {
        NumericPolicy {
            strict: self.strict_numeric,
            thousands_separator: self.thousands_separator,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Config file from `SUSTAINALYZE_CONFIG`, else `sustainalyze.toml`.
    /// A `.env` file is loaded first when present.
    pub fn new() -> Self {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self { path }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Defaults, then the TOML file (if it exists), then `SUSTAINALYZE_*`
    /// environment variables.
    pub fn figment(&self) -> Figment {
        Figment::from(Serialized::defaults(DashboardConfig::default()))
            .merge(Toml::file(&self.path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
    }

    pub fn load(&self) -> Result<DashboardConfig> {
        let config: DashboardConfig = self
            .figment()
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        config
            .validate()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
