use std::time::Duration;

use jobdash_source_api::{
    SourceError,
    SourceResult,
};

pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const DEFAULT_MAX_FOLDER_DEPTH: usize = 16;
pub(crate) const DEFAULT_MAX_BUILDS: usize = 100;

/// Connection settings for a Jenkins installation
#[derive(Debug, Clone)]
pub struct JenkinsSettings {
    pub base_url: String,
    pub username: String,
    pub token: String,
    /// Deadline applied to every upstream call
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Folders nested deeper than this are not expanded
    pub max_folder_depth: usize,
    /// Size of the recent build window requested per job
    pub max_builds: usize,
}

impl JenkinsSettings {
    pub fn new(
        base_url: impl Into<String>, username: impl Into<String>, token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            token: token.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_folder_depth: DEFAULT_MAX_FOLDER_DEPTH,
            max_builds: DEFAULT_MAX_BUILDS,
        }
    }

    pub(crate) fn validate(&self) -> SourceResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(SourceError::InvalidConfig(
                "Missing Jenkins base URL".to_string(),
            ));
        }
        if self.username.trim().is_empty() {
            return Err(SourceError::InvalidConfig(
                "Missing Jenkins username".to_string(),
            ));
        }
        if self.token.trim().is_empty() {
            return Err(SourceError::InvalidConfig(
                "Missing Jenkins API token".to_string(),
            ));
        }
        if self.max_builds == 0 {
            return Err(SourceError::InvalidConfig(
                "max_builds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn normalized_base_url(&self) -> String {
        self.base_url.trim().trim_end_matches('/').to_string()
    }
}

/// API path of a child folder: `parent + "/job/" + name`, name percent-encoded.
pub(crate) fn child_folder_path(parent: &str, name: &str) -> String {
    format!("{}/job/{}", parent, urlencoding::encode(name))
}

/// Key identifying a folder for cycle detection. Prefers the canonical URL
/// reported by Jenkins so aliases of the same folder collapse.
pub(crate) fn folder_identity(url: Option<&str>, api_path: &str) -> String {
    match url {
        Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => api_path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_folder_path() {
        assert_eq!(child_folder_path("", "teamA"), "/job/teamA");
        assert_eq!(child_folder_path("/job/teamA", "sub"), "/job/teamA/job/sub");
        assert_eq!(child_folder_path("", "Team A"), "/job/Team%20A");
    }

    #[test]
    fn test_folder_identity() {
        assert_eq!(
            folder_identity(Some("https://ci/job/teamA/"), "/job/teamA"),
            "https://ci/job/teamA"
        );
        assert_eq!(folder_identity(None, "/job/teamA"), "/job/teamA");
        assert_eq!(folder_identity(Some("  "), "/job/teamA"), "/job/teamA");
    }

    #[test]
    fn test_validate_missing_fields() {
        let ok = JenkinsSettings::new("https://ci", "admin", "token");
        assert!(ok.validate().is_ok());

        for settings in [
            JenkinsSettings::new("", "admin", "token"),
            JenkinsSettings::new("https://ci", " ", "token"),
            JenkinsSettings::new("https://ci", "admin", ""),
        ] {
            assert!(matches!(
                settings.validate(),
                Err(SourceError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_normalized_base_url() {
        let settings = JenkinsSettings::new(" https://ci.example.com/ ", "a", "b");
        assert_eq!(settings.normalized_base_url(), "https://ci.example.com");
    }
}
