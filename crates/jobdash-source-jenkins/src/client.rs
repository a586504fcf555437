//! Jenkins API client methods

use jobdash_source_api::{
    RawFolderNode,
    SourceError,
    SourceResult,
};
use reqwest::{
    Client,
    StatusCode,
};

/// Jenkins API client. Every call is attempted once; the per-call deadline
/// is configured on the underlying `reqwest::Client`.
pub(crate) struct JenkinsClient {
    client: Client,
    server_url: String,
    max_builds: usize,
}

impl JenkinsClient {
    pub fn new(client: Client, server_url: String, max_builds: usize) -> Self {
        Self {
            client,
            server_url,
            max_builds,
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Tree query selecting everything the normalizer reads, with the build
    /// history limited to the most recent `max_builds` records.
    fn tree_query(&self) -> String {
        format!(
            "jobs[name,url,_class,buildable,color,inQueue,\
             lastBuild[number,result,url,timestamp,duration],\
             lastSuccessfulBuild[number,timestamp,duration],\
             lastFailedBuild[number,timestamp,duration],\
             builds[timestamp,result,duration]{{0,{}}}]",
            self.max_builds
        )
    }

    /// Fetches the listing of one folder. `path` is empty for the root or a
    /// chain of `/job/<name>` segments.
    pub async fn fetch_folder(&self, path: &str) -> SourceResult<RawFolderNode> {
        let url = format!(
            "{}{}/api/json?tree={}",
            self.server_url,
            path,
            self.tree_query()
        );

        tracing::debug!(%url, "Fetching Jenkins folder listing");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_request_error(&url, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(SourceError::Unauthorized(format!(
                "Jenkins rejected credentials for {url}"
            )));
        }
        if !status.is_success() {
            return Err(SourceError::Api(format!("HTTP {status} from {url}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_request_error(&url, e))?;

        serde_json::from_str(&body)
            .map_err(|e| SourceError::Parse(format!("Failed to parse listing at {url}: {e}")))
    }
}

fn map_request_error(url: &str, err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout(format!("{url}: {err}"))
    } else if err.is_connect() {
        SourceError::Unreachable(format!("{url}: {err}"))
    } else {
        SourceError::Api(format!("Request to {url} failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    fn install_crypto_provider() {
        let _ = rustls::crypto::ring::default_provider().install_default();
    }

    fn client_for(server_url: String) -> JenkinsClient {
        install_crypto_provider();
        JenkinsClient::new(Client::new(), server_url, 25)
    }

    #[test]
    fn test_tree_query_limits_build_window() {
        let client = client_for("http://localhost".to_string());
        let query = client.tree_query();
        assert!(query.starts_with("jobs[name,url,_class,"));
        assert!(query.ends_with("builds[timestamp,result,duration]{0,25}]"));
    }

    #[tokio::test]
    async fn test_fetch_root_listing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/json")
            .match_query(Matcher::Regex("tree=jobs".to_string()))
            .with_header("content-type", "application/json")
            .with_body(r#"{"jobs":[{"_class":"hudson.model.FreeStyleProject","name":"build"}]}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        let node = client.fetch_folder("").await.unwrap();

        mock.assert_async().await;
        assert_eq!(node.jobs.len(), 1);
        assert_eq!(node.jobs[0].name, "build");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/json")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.fetch_folder("").await.unwrap_err();
        assert!(matches!(err, SourceError::Unauthorized(_)));
        assert!(err.is_unreachable());
    }

    #[tokio::test]
    async fn test_server_error_is_not_unreachable() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/job/teamA/api/json")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.fetch_folder("/job/teamA").await.unwrap_err();
        assert!(matches!(err, SourceError::Api(_)));
        assert!(!err.is_unreachable());
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/json")
            .match_query(Matcher::Any)
            .with_body("<html>login</html>")
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.fetch_folder("").await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_unreachable() {
        let client = client_for("http://127.0.0.1:1".to_string());
        let err = client.fetch_folder("").await.unwrap_err();
        assert!(matches!(err, SourceError::Unreachable(_)), "{err:?}");
    }
}
