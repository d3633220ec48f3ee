use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants;
use crate::error::Result;

/// Pipeline configuration, loaded from `config.toml` when present.
///
/// Every knob has a default, so a missing config file is not an error.
/// Components receive their configuration explicitly at construction.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub paths: PathsConfig,
    pub normalize: NormalizeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub rosgranstroy_url: String,
    pub kaspiko_url: String,
    pub request_timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            rosgranstroy_url: constants::ROSGRANSTROY_API_URL.to_string(),
            kaspiko_url: constants::KASPIKO_PAGE_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub raw_data_dir: PathBuf,
    pub data_dir: PathBuf,
    pub frontend_data_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_data_dir: PathBuf::from("raw_data"),
            data_dir: PathBuf::from("data"),
            frontend_data_dir: PathBuf::from("frontend/data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Locale key picked when a leaf value is a map of translations.
    /// A missing key yields an empty value, not another locale.
    pub preferred_locale: String,
    pub country_prefix: String,
    pub fallback_region_code: String,
    /// Override for the `last_update` stamp on flat-source records
    /// (ISO date). Defaults to today's UTC date when unset.
    pub run_date: Option<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            preferred_locale: "ru".to_string(),
            country_prefix: constants::COUNTRY_PREFIX.to_string(),
            fallback_region_code: constants::FALLBACK_REGION_CODE.to_string(),
            run_date: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let config_content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Resolved `last_update` stamp for flat-source records.
    pub fn run_date(&self) -> String {
        self.normalize
            .run_date
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().date_naive().to_string())
    }
}
