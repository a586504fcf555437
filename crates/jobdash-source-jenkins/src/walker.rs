//! Depth-first flattening of the Jenkins folder hierarchy

use std::collections::HashSet;

use jobdash_source_api::{
    RawJob,
    SourceResult,
};

use crate::client::JenkinsClient;
use crate::config;

struct Frame {
    path: String,
    depth: usize,
    entries: std::vec::IntoIter<RawJob>,
}

/// Walks folders one request at a time, preserving the order entries appear
/// in each listing.
///
/// A failure on the root listing is returned to the caller. Failures on any
/// folder below the root are logged and that subtree contributes no jobs.
/// Folders deeper than `max_depth`, or already visited, are skipped.
pub(crate) struct FolderWalker<'a> {
    client: &'a JenkinsClient,
    max_depth: usize,
}

impl<'a> FolderWalker<'a> {
    pub fn new(client: &'a JenkinsClient, max_depth: usize) -> Self {
        Self { client, max_depth }
    }

    pub async fn walk(&self) -> SourceResult<Vec<RawJob>> {
        let root = self.client.fetch_folder("").await?;

        let mut jobs = Vec::new();
        let mut visited = HashSet::new();
        let mut folders = 1usize;
        let mut failed = 0usize;
        let mut stack = vec![Frame {
            path: String::new(),
            depth: 0,
            entries: root.jobs.into_iter(),
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(entry) = frame.entries.next() else {
                stack.pop();
                continue;
            };

            if !entry.is_folder() {
                jobs.push(entry);
                continue;
            }

            let path = config::child_folder_path(&frame.path, &entry.name);
            let depth = frame.depth + 1;

            if depth > self.max_depth {
                tracing::warn!(
                    %path,
                    max_depth = self.max_depth,
                    "Folder nesting exceeds limit, skipping subtree"
                );
                continue;
            }

            if !visited.insert(config::folder_identity(entry.url.as_deref(), &path)) {
                tracing::warn!(%path, "Folder already visited, skipping");
                continue;
            }

            folders += 1;
            match self.client.fetch_folder(&path).await {
                Ok(node) => stack.push(Frame {
                    path,
                    depth,
                    entries: node.jobs.into_iter(),
                }),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(%path, error = %e, "Failed to fetch folder, skipping subtree");
                }
            }
        }

        tracing::info!(
            server = self.client.server_url(),
            jobs = jobs.len(),
            folders,
            failed,
            "Folder walk complete"
        );

        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use mockito::{
        Matcher,
        Server,
    };
    use reqwest::Client;

    use super::*;

    const FOLDER: &str = "com.cloudbees.hudson.plugins.folder.Folder";
    const JOB: &str = "hudson.model.FreeStyleProject";

    fn client_for(server: &Server, max_builds: usize) -> JenkinsClient {
        let _ = rustls::crypto::ring::default_provider().install_default();
        JenkinsClient::new(Client::new(), server.url(), max_builds)
    }

    fn folder(name: &str) -> String {
        format!(r#"{{"_class":"{FOLDER}","name":"{name}"}}"#)
    }

    fn job(name: &str) -> String {
        format!(r#"{{"_class":"{JOB}","name":"{name}"}}"#)
    }

    fn listing(entries: &[String]) -> String {
        format!(r#"{{"jobs":[{}]}}"#, entries.join(","))
    }

    async fn serve(server: &mut Server, path: &str, body: String) -> mockito::Mock {
        server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    fn names(jobs: &[RawJob]) -> Vec<&str> {
        jobs.iter().map(|j| j.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_root() {
        let mut server = Server::new_async().await;
        let _m = serve(&mut server, "/api/json", listing(&[])).await;

        let client = client_for(&server, 10);
        let jobs = FolderWalker::new(&client, 16).walk().await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_single_level() {
        let mut server = Server::new_async().await;
        let _m = serve(&mut server, "/api/json", listing(&[job("a"), job("b")])).await;

        let client = client_for(&server, 10);
        let jobs = FolderWalker::new(&client, 16).walk().await.unwrap();
        assert_eq!(names(&jobs), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_nested_folders_depth_first_in_listing_order() {
        let mut server = Server::new_async().await;
        let _m = serve(
            &mut server,
            "/api/json",
            listing(&[job("root-1"), folder("teamA"), job("root-2"), folder("teamB")]),
        )
        .await;
        let _m = serve(
            &mut server,
            "/job/teamA/api/json",
            listing(&[folder("sub"), job("a-1")]),
        )
        .await;
        let _m = serve(&mut server, "/job/teamA/job/sub/api/json", listing(&[job("deep")])).await;
        let _m = serve(&mut server, "/job/teamB/api/json", listing(&[job("b-1")])).await;

        let client = client_for(&server, 10);
        let jobs = FolderWalker::new(&client, 16).walk().await.unwrap();
        assert_eq!(names(&jobs), vec!["root-1", "deep", "a-1", "root-2", "b-1"]);
    }

    #[tokio::test]
    async fn test_subtree_failure_is_absorbed() {
        let mut server = Server::new_async().await;
        let _m = serve(
            &mut server,
            "/api/json",
            listing(&[folder("broken"), folder("ok"), job("top")]),
        )
        .await;
        let _m = server
            .mock("GET", "/job/broken/api/json")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let _m = serve(&mut server, "/job/ok/api/json", listing(&[job("inner")])).await;

        let client = client_for(&server, 10);
        let jobs = FolderWalker::new(&client, 16).walk().await.unwrap();
        assert_eq!(names(&jobs), vec!["inner", "top"]);
    }

    #[tokio::test]
    async fn test_malformed_entries_do_not_fail_listing() {
        let mut server = Server::new_async().await;
        let _m = serve(
            &mut server,
            "/api/json",
            listing(&[job("good"), r#"{"name":null,"buildable":"no"}"#.to_string(), folder("teamA")]),
        )
        .await;
        let _m = serve(
            &mut server,
            "/job/teamA/api/json",
            listing(&[r#"{"name":5}"#.to_string(), job("inner")]),
        )
        .await;

        let client = client_for(&server, 10);
        let jobs = FolderWalker::new(&client, 16).walk().await.unwrap();
        assert_eq!(names(&jobs), vec!["good", "", "", "inner"]);
        assert_eq!(jobs[1].buildable, None);
    }

    #[tokio::test]
    async fn test_root_failure_propagates() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/json")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = client_for(&server, 10);
        let err = FolderWalker::new(&client, 16).walk().await.unwrap_err();
        assert!(err.is_unreachable());
    }

    #[tokio::test]
    async fn test_depth_limit_skips_deep_folders() {
        let mut server = Server::new_async().await;
        let _m = serve(&mut server, "/api/json", listing(&[folder("l1"), job("top")])).await;
        let _m = serve(&mut server, "/job/l1/api/json", listing(&[folder("l2"), job("one")])).await;
        let deep = server
            .mock("GET", "/job/l1/job/l2/api/json")
            .match_query(Matcher::Any)
            .with_body(listing(&[job("two")]))
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, 10);
        let jobs = FolderWalker::new(&client, 1).walk().await.unwrap();
        assert_eq!(names(&jobs), vec!["one", "top"]);
        deep.assert_async().await;
    }

    #[tokio::test]
    async fn test_cyclic_folder_urls_visited_once() {
        let mut server = Server::new_async().await;
        let url = server.url();
        let loop_folder =
            format!(r#"{{"_class":"{FOLDER}","name":"loop","url":"{url}/job/loop/"}}"#);
        let _m = serve(&mut server, "/api/json", listing(&[loop_folder.clone()])).await;
        let _m = serve(
            &mut server,
            "/job/loop/api/json",
            listing(&[loop_folder, job("leaf")]),
        )
        .await;

        let client = client_for(&server, 10);
        let jobs = FolderWalker::new(&client, 16).walk().await.unwrap();
        assert_eq!(names(&jobs), vec!["leaf"]);
    }
}
