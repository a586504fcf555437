use std::path::{
    Path,
    PathBuf,
};

use jobdash_source_api::parse_keyword_list;
use thiserror::Error;

use super::interpolation::{
    interpolate_toml,
    InterpolationError,
};
use super::schema::DashboardConfig;

pub const CONFIG_PATH_ENV: &str = "JOBDASH_CONFIG_PATH";
const LOCAL_CONFIG_FILE: &str = "jobdash.toml";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Environment variable interpolation failed: {0}")]
    InterpolationError(#[from] InterpolationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ConfigLoadResult<T> = Result<T, ConfigLoadError>;

pub struct ConfigLoader;

impl ConfigLoader {
    /// `JOBDASH_CONFIG_PATH`, then `./jobdash.toml`, then the user config
    /// directory. The returned path may not exist.
    pub fn discover_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            tracing::debug!("Using config path from {}: {}", CONFIG_PATH_ENV, path);
            return PathBuf::from(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            tracing::debug!("Using local config path: {}", local.display());
            return local;
        }

        let fallback = dirs::config_dir()
            .map(|dir| dir.join("jobdash").join("config.toml"))
            .unwrap_or(local);
        tracing::debug!("Using fallback config path: {}", fallback.display());
        fallback
    }

    /// Discovers, loads and applies environment overrides.
    pub fn load_default() -> ConfigLoadResult<DashboardConfig> {
        let path = Self::discover_config_path();
        let mut config = Self::load(&path)?;
        Self::apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Loads a config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> ConfigLoadResult<DashboardConfig> {
        if !path.exists() {
            tracing::info!(
                path = %path.display(),
                "No config file found, using defaults"
            );
            return Ok(DashboardConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> ConfigLoadResult<DashboardConfig> {
        let mut value: toml::Value = toml::from_str(content)?;

        interpolate_toml(&mut value)?;

        let config: DashboardConfig = value.try_into().map_err(|e| {
            ConfigLoadError::InvalidConfig(format!("Failed to deserialize config: {}", e))
        })?;

        tracing::debug!(
            bind_addr = %config.server.bind_addr,
            jenkins_configured = config.jenkins.missing_fields().is_empty(),
            "Loaded config"
        );

        Ok(config)
    }

    pub fn apply_env_overrides(config: &mut DashboardConfig) -> ConfigLoadResult<()> {
        Self::apply_overrides(config, |name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`. `PORT` only replaces the port of
    /// the bind address; `JOBDASH_BIND_ADDR` replaces the whole address and
    /// wins over `PORT`.
    pub fn apply_overrides<F>(config: &mut DashboardConfig, lookup: F) -> ConfigLoadResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("JENKINS_BASE_URL") {
            config.jenkins.base_url = Some(url);
        }
        if let Some(user) = get("JENKINS_USER") {
            config.jenkins.username = Some(user);
        }
        if let Some(token) = get("JENKINS_TOKEN") {
            config.jenkins.token = Some(token);
        }
        if let Some(keywords) = get("TEST_JOB_KEYWORDS") {
            config.classification.test_keywords = parse_keyword_list(&keywords);
        }
        if let Some(words) = get("TEST_JOB_EXCLUDE_WORDS") {
            config.classification.exclude_words = parse_keyword_list(&words);
        }
        if let Some(origin) = get("CORS_ORIGIN") {
            config.server.cors_origin = Some(origin);
        }

        if let Some(port) = get("PORT") {
            let port: u16 = port.trim().parse().map_err(|_| {
                ConfigLoadError::InvalidConfig(format!("PORT is not a valid port: {}", port))
            })?;
            let host = config
                .server
                .bind_addr
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            config.server.bind_addr = format!("{}:{}", host, port);
        }
        if let Some(addr) = get("JOBDASH_BIND_ADDR") {
            config.server.bind_addr = addr;
        }

        Ok(())
    }
}
