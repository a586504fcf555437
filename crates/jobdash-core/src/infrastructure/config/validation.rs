use std::net::SocketAddr;

use super::schema::{
    DashboardConfig,
    JenkinsConfig,
};

/// Upper bound for the insights windows, roughly a century.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<ConfigWarning>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    pub fn add_error(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ConfigWarning) {
        self.warnings.push(warning);
    }

    pub fn summary(&self) -> String {
        if self.errors.is_empty() && self.warnings.is_empty() {
            "Configuration is valid".to_string()
        } else {
            format!(
                "{} error(s), {} warning(s)",
                self.errors.len(),
                self.warnings.len()
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigError {
    pub field: String,
    pub message: String,
    pub code: ConfigErrorCode,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    InvalidValue,
    OutOfRange,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue => write!(f, "INVALID_VALUE"),
            Self::OutOfRange => write!(f, "OUT_OF_RANGE"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub code: ConfigWarningCode,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWarningCode {
    /// Jenkins connection incomplete; data endpoints will fail per request
    MissingCredentials,
    InsecureTransport,
    NoTestKeywords,
}

impl std::fmt::Display for ConfigWarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "MISSING_CREDENTIALS"),
            Self::InsecureTransport => write!(f, "INSECURE_TRANSPORT"),
            Self::NoTestKeywords => write!(f, "NO_TEST_KEYWORDS"),
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &DashboardConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        if config.server.bind_addr.parse::<SocketAddr>().is_err() {
            result.add_error(ConfigError {
                field: "server.bind_addr".to_string(),
                message: format!("'{}' is not a socket address", config.server.bind_addr),
                code: ConfigErrorCode::InvalidValue,
            });
        }

        Self::validate_jenkins(&config.jenkins, &mut result);

        if config.classification.rules().test_keywords().is_empty() {
            result.add_warning(ConfigWarning {
                field: "classification.test_keywords".to_string(),
                message: "No test keywords configured; no job will be classified as a test job"
                    .to_string(),
                code: ConfigWarningCode::NoTestKeywords,
            });
        }

        let insights = &config.insights;
        for (field, value) in [
            ("insights.active_window_days", insights.active_window_days),
            (
                "insights.inactive_threshold_days",
                insights.inactive_threshold_days,
            ),
        ] {
            if !(1..=MAX_WINDOW_DAYS).contains(&value) {
                result.add_error(ConfigError {
                    field: field.to_string(),
                    message: format!("must be between 1 and {} days", MAX_WINDOW_DAYS),
                    code: ConfigErrorCode::OutOfRange,
                });
            }
        }
        if insights.mock_job_count == 0 {
            result.add_error(ConfigError {
                field: "insights.mock_job_count".to_string(),
                message: "must be at least 1".to_string(),
                code: ConfigErrorCode::OutOfRange,
            });
        }

        result
    }

    fn validate_jenkins(jenkins: &JenkinsConfig, result: &mut ValidationResult) {
        let missing = jenkins.missing_fields();
        if !missing.is_empty() {
            result.add_warning(ConfigWarning {
                field: "jenkins".to_string(),
                message: format!("Missing {}", missing.join(", ")),
                code: ConfigWarningCode::MissingCredentials,
            });
        }

        if let Some(url) = jenkins.base_url.as_deref().map(str::trim) {
            if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ConfigError {
                    field: "jenkins.base_url".to_string(),
                    message: format!("'{}' must start with http:// or https://", url),
                    code: ConfigErrorCode::InvalidValue,
                });
            } else if url.starts_with("http://") {
                result.add_warning(ConfigWarning {
                    field: "jenkins.base_url".to_string(),
                    message: "Credentials will be sent over plain HTTP".to_string(),
                    code: ConfigWarningCode::InsecureTransport,
                });
            }
        }

        if jenkins.max_builds == 0 {
            result.add_error(ConfigError {
                field: "jenkins.max_builds".to_string(),
                message: "must be at least 1".to_string(),
                code: ConfigErrorCode::OutOfRange,
            });
        }
        if jenkins.request_timeout_secs == 0 {
            result.add_error(ConfigError {
                field: "jenkins.request_timeout_secs".to_string(),
                message: "must be at least 1 second".to_string(),
                code: ConfigErrorCode::OutOfRange,
            });
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> ValidationResult {
        ConfigValidator::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_only_warn_about_credentials() {
        let result = DashboardConfig::default().validate();
        assert!(result.is_ok());
        assert!(result.has_issues());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings[0].code,
            ConfigWarningCode::MissingCredentials
        );
        assert_eq!(result.summary(), "0 error(s), 1 warning(s)");
    }

    #[test]
    fn test_complete_config_is_valid() {
        let mut config = DashboardConfig::default();
        config.jenkins.base_url = Some("https://ci.example.com".to_string());
        config.jenkins.username = Some("admin".to_string());
        config.jenkins.token = Some("token".to_string());

        let result = config.validate();
        assert!(!result.has_issues());
        assert_eq!(result.summary(), "Configuration is valid");
    }

    #[test]
    fn test_invalid_values() {
        let mut config = DashboardConfig::default();
        config.server.bind_addr = "nowhere".to_string();
        config.jenkins.base_url = Some("ci.example.com".to_string());
        config.jenkins.max_builds = 0;
        config.insights.active_window_days = 0;

        let result = config.validate();
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "server.bind_addr",
                "jenkins.base_url",
                "jenkins.max_builds",
                "insights.active_window_days"
            ]
        );
        assert_eq!(
            result.errors[0].to_string(),
            "server.bind_addr: 'nowhere' is not a socket address (INVALID_VALUE)"
        );
    }

    #[test]
    fn test_window_days_upper_bound() {
        let mut config = DashboardConfig::default();
        config.insights.active_window_days = MAX_WINDOW_DAYS;
        assert!(config.validate().is_ok());

        config.insights.active_window_days = 1_000_000_000;
        config.insights.inactive_threshold_days = MAX_WINDOW_DAYS + 1;
        let result = config.validate();
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["insights.active_window_days", "insights.inactive_threshold_days"]
        );
        assert!(result
            .errors
            .iter()
            .all(|e| e.code == ConfigErrorCode::OutOfRange));
    }

    #[test]
    fn test_plain_http_and_empty_keywords_warn() {
        let mut config = DashboardConfig::default();
        config.jenkins.base_url = Some("http://ci.local".to_string());
        config.jenkins.username = Some("u".to_string());
        config.jenkins.token = Some("t".to_string());
        config.classification.test_keywords = vec![" ".to_string()];

        let codes: Vec<ConfigWarningCode> = config
            .validate()
            .warnings
            .iter()
            .map(|w| w.code)
            .collect();
        assert_eq!(
            codes,
            vec![
                ConfigWarningCode::InsecureTransport,
                ConfigWarningCode::NoTestKeywords
            ]
        );
    }
}
