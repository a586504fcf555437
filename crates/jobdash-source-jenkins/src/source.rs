//! Jenkins job source implementation

use async_trait::async_trait;
use jobdash_source_api::{
    JobSource,
    RawJob,
    SourceError,
    SourceKind,
    SourceMetadata,
    SourceResult,
};
use reqwest::header::{
    HeaderMap,
    HeaderValue,
    ACCEPT,
    AUTHORIZATION,
};

use crate::client::JenkinsClient;
use crate::config::JenkinsSettings;
use crate::walker::FolderWalker;

/// Live job source backed by a Jenkins installation
pub struct JenkinsSource {
    metadata: SourceMetadata,
    client: JenkinsClient,
    max_folder_depth: usize,
}

impl JenkinsSource {
    /// Builds the HTTP client with Basic authentication and the per-call
    /// deadline. Fails with `InvalidConfig` when the base URL, username or
    /// token is missing.
    pub fn new(settings: JenkinsSettings) -> SourceResult<Self> {
        settings.validate()?;

        let auth_value = format!("{}:{}", settings.username, settings.token);
        let auth_header = format!(
            "Basic {}",
            base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                auth_value.as_bytes()
            )
        );

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&auth_header)
            .map_err(|e| SourceError::InvalidConfig(format!("Invalid auth format: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| SourceError::Internal(format!("Failed to build HTTP client: {e}")))?;

        let server_url = settings.normalized_base_url();

        Ok(Self {
            metadata: SourceMetadata {
                name: "Jenkins".to_string(),
                kind: SourceKind::Jenkins,
                base_url: server_url.clone(),
            },
            client: JenkinsClient::new(http_client, server_url, settings.max_builds),
            max_folder_depth: settings.max_folder_depth,
        })
    }
}

#[async_trait]
impl JobSource for JenkinsSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    async fn fetch_jobs(&self) -> SourceResult<Vec<RawJob>> {
        FolderWalker::new(&self.client, self.max_folder_depth)
            .walk()
            .await
    }
}
