use std::time::Duration;

use jobdash_source_api::{
    ClassificationRules,
    DEFAULT_EXCLUDE_WORDS,
    DEFAULT_TEST_KEYWORDS,
};
use jobdash_source_jenkins::JenkinsSettings;
use serde::{
    Deserialize,
    Serialize,
};

use crate::domain::{
    DomainError,
    DomainResult,
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_FOLDER_DEPTH: usize = 16;
pub const DEFAULT_MAX_BUILDS: usize = 100;
pub const DEFAULT_ACTIVE_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_INACTIVE_THRESHOLD_DAYS: i64 = 60;
pub const DEFAULT_MOCK_JOB_COUNT: usize = 856;
pub const DEFAULT_MOCK_SEED: u64 = 42;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub jenkins: JenkinsConfig,

    #[serde(default)]
    pub classification: ClassificationConfig,

    #[serde(default)]
    pub insights: InsightsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Allowed browser origin; any origin when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_origin: None,
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JenkinsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_max_folder_depth")]
    pub max_folder_depth: usize,

    #[serde(default = "default_max_builds")]
    pub max_builds: usize,
}

impl Default for JenkinsConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username: None,
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_folder_depth: default_max_folder_depth(),
            max_builds: default_max_builds(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_max_folder_depth() -> usize {
    DEFAULT_MAX_FOLDER_DEPTH
}

fn default_max_builds() -> usize {
    DEFAULT_MAX_BUILDS
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl JenkinsConfig {
    /// Environment variable names of the connection fields that are unset.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if present(&self.base_url).is_none() {
            missing.push("JENKINS_BASE_URL");
        }
        if present(&self.username).is_none() {
            missing.push("JENKINS_USER");
        }
        if present(&self.token).is_none() {
            missing.push("JENKINS_TOKEN");
        }
        missing
    }

    pub fn settings(&self) -> DomainResult<JenkinsSettings> {
        let (Some(base_url), Some(username), Some(token)) = (
            present(&self.base_url),
            present(&self.username),
            present(&self.token),
        ) else {
            return Err(DomainError::InvalidConfig(format!(
                "Jenkins configuration missing. Please set {}",
                self.missing_fields().join(", ")
            )));
        };

        let mut settings = JenkinsSettings::new(base_url, username, token);
        settings.request_timeout = Duration::from_secs(self.request_timeout_secs);
        settings.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        settings.max_folder_depth = self.max_folder_depth;
        settings.max_builds = self.max_builds;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationConfig {
    #[serde(default = "default_test_keywords")]
    pub test_keywords: Vec<String>,

    #[serde(default = "default_exclude_words")]
    pub exclude_words: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            test_keywords: default_test_keywords(),
            exclude_words: default_exclude_words(),
        }
    }
}

fn default_test_keywords() -> Vec<String> {
    DEFAULT_TEST_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn default_exclude_words() -> Vec<String> {
    DEFAULT_EXCLUDE_WORDS.iter().map(|s| s.to_string()).collect()
}

impl ClassificationConfig {
    pub fn rules(&self) -> ClassificationRules {
        ClassificationRules::new(&self.test_keywords, &self.exclude_words)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightsConfig {
    /// A job is active when built within this many days
    #[serde(default = "default_active_window_days")]
    pub active_window_days: i64,

    #[serde(default = "default_inactive_threshold_days")]
    pub inactive_threshold_days: i64,

    /// Size of the synthetic fleet served in degraded mode
    #[serde(default = "default_mock_job_count")]
    pub mock_job_count: usize,

    #[serde(default = "default_mock_seed")]
    pub mock_seed: u64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            active_window_days: default_active_window_days(),
            inactive_threshold_days: default_inactive_threshold_days(),
            mock_job_count: default_mock_job_count(),
            mock_seed: default_mock_seed(),
        }
    }
}

fn default_active_window_days() -> i64 {
    DEFAULT_ACTIVE_WINDOW_DAYS
}

fn default_inactive_threshold_days() -> i64 {
    DEFAULT_INACTIVE_THRESHOLD_DAYS
}

fn default_mock_job_count() -> usize {
    DEFAULT_MOCK_JOB_COUNT
}

fn default_mock_seed() -> u64 {
    DEFAULT_MOCK_SEED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.server.bind_addr, "0.0.0.0:3001");
        assert_eq!(config.server.cors_origin, None);
        assert_eq!(config.jenkins.request_timeout_secs, 30);
        assert_eq!(config.jenkins.max_folder_depth, 16);
        assert_eq!(config.jenkins.max_builds, 100);
        assert_eq!(config.insights.active_window_days, 7);
        assert_eq!(config.insights.inactive_threshold_days, 60);
        assert_eq!(config.insights.mock_job_count, 856);
        assert_eq!(
            config.classification.rules(),
            ClassificationRules::default()
        );
    }

    #[test]
    fn test_settings_require_all_credentials() {
        let config = JenkinsConfig {
            base_url: Some("https://ci.example.com".to_string()),
            token: Some("   ".to_string()),
            ..Default::default()
        };

        assert_eq!(config.missing_fields(), vec!["JENKINS_USER", "JENKINS_TOKEN"]);
        match config.settings() {
            Err(DomainError::InvalidConfig(msg)) => {
                assert!(msg.contains("JENKINS_USER, JENKINS_TOKEN"));
                assert!(!msg.contains("JENKINS_BASE_URL"));
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_settings_carry_limits() {
        let config = JenkinsConfig {
            base_url: Some("https://ci.example.com/".to_string()),
            username: Some("admin".to_string()),
            token: Some("t0ken".to_string()),
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
            max_folder_depth: 3,
            max_builds: 20,
        };

        let settings = config.settings().unwrap();
        assert_eq!(settings.base_url, "https://ci.example.com/");
        assert_eq!(settings.username, "admin");
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.connect_timeout, Duration::from_secs(2));
        assert_eq!(settings.max_folder_depth, 3);
        assert_eq!(settings.max_builds, 20);
    }
}
