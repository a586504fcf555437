use std::sync::Arc;

use chrono::{
    DateTime,
    Utc,
};
use jobdash_source_api::{
    ClassificationRules,
    JobSource,
    SourceError,
    SourceKind,
    SourceResult,
};
use jobdash_source_jenkins::JenkinsSource;

use crate::application::aggregator::aggregate;
use crate::application::insights::{
    cleanup_report,
    performance_report,
};
use crate::application::normalizer::JobNormalizer;
use crate::application::query::{
    JobPage,
    JobQuery,
};
use crate::domain::{
    CleanupReport,
    DomainError,
    DomainResult,
    FleetMetrics,
    JobSummary,
    PerformanceReport,
};
use crate::infrastructure::config::{
    DashboardConfig,
    InsightsConfig,
};
use crate::infrastructure::SyntheticSource;

pub const DEGRADED_WARNING: &str = "Using mock data - check Jenkins configuration";

/// The live upstream, or the reason it could not be built.
pub enum LiveSource {
    Ready(Arc<dyn JobSource>),
    Misconfigured(String),
}

/// Data computed from one fetch, with where it came from.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub data: T,
    pub synced_at: DateTime<Utc>,
    pub source: SourceKind,
    /// Set when the data is synthetic
    pub warning: Option<String>,
}

impl<T> Snapshot<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Snapshot<U> {
        Snapshot {
            data: f(self.data),
            synced_at: self.synced_at,
            source: self.source,
            warning: self.warning,
        }
    }

    pub fn try_map<U>(self, f: impl FnOnce(T) -> DomainResult<U>) -> DomainResult<Snapshot<U>> {
        Ok(Snapshot {
            data: f(self.data)?,
            synced_at: self.synced_at,
            source: self.source,
            warning: self.warning,
        })
    }

    pub fn is_degraded(&self) -> bool {
        self.source == SourceKind::Synthetic
    }
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub total: usize,
    pub synced_at: DateTime<Utc>,
}

/// Runs every request through fetch, normalize and derive.
///
/// Reads go to the live source; when it is unreachable or rejects the
/// credentials, the fallback source serves the same pipeline and the
/// snapshot carries a warning. Nothing is cached between calls.
pub struct JobService {
    live: LiveSource,
    fallback: Arc<dyn JobSource>,
    rules: ClassificationRules,
    max_builds: usize,
    insights: InsightsConfig,
}

impl JobService {
    pub fn new(
        live: LiveSource, fallback: Arc<dyn JobSource>, rules: ClassificationRules,
        max_builds: usize, insights: InsightsConfig,
    ) -> Self {
        Self {
            live,
            fallback,
            rules,
            max_builds,
            insights,
        }
    }

    /// Wires the Jenkins source and the synthetic fallback from config.
    /// Incomplete Jenkins settings do not fail here; data requests report
    /// them instead.
    pub fn from_config(config: &DashboardConfig) -> Self {
        let live = match config.jenkins.settings() {
            Ok(settings) => match JenkinsSource::new(settings) {
                Ok(source) => LiveSource::Ready(Arc::new(source)),
                Err(SourceError::InvalidConfig(msg)) => LiveSource::Misconfigured(msg),
                Err(e) => LiveSource::Misconfigured(e.to_string()),
            },
            Err(DomainError::InvalidConfig(msg)) => LiveSource::Misconfigured(msg),
            Err(e) => LiveSource::Misconfigured(e.to_string()),
        };

        if let LiveSource::Misconfigured(reason) = &live {
            tracing::warn!(%reason, "Jenkins source not configured");
        }

        let fallback = Arc::new(SyntheticSource::new(
            config.insights.mock_job_count,
            config.insights.mock_seed,
        ));

        Self::new(
            live,
            fallback,
            config.classification.rules(),
            config.jenkins.max_builds,
            config.insights.clone(),
        )
    }

    pub fn rules(&self) -> &ClassificationRules {
        &self.rules
    }

    pub fn config_error(&self) -> Option<&str> {
        match &self.live {
            LiveSource::Ready(_) => None,
            LiveSource::Misconfigured(reason) => Some(reason),
        }
    }

    fn live(&self) -> DomainResult<&Arc<dyn JobSource>> {
        match &self.live {
            LiveSource::Ready(source) => Ok(source),
            LiveSource::Misconfigured(reason) => Err(DomainError::InvalidConfig(reason.clone())),
        }
    }

    async fn fetch_from(
        &self, source: &dyn JobSource, now: DateTime<Utc>,
    ) -> SourceResult<Vec<JobSummary>> {
        let raw = source.fetch_jobs().await?;
        let normalizer = JobNormalizer::new(
            &source.metadata().base_url,
            &self.rules,
            self.max_builds,
            now,
        );
        Ok(normalizer.normalize_all(&raw))
    }

    /// Every job, normalized, from the live source or the fallback.
    pub async fn collect(&self) -> DomainResult<Snapshot<Vec<JobSummary>>> {
        let live = self.live()?;
        let now = Utc::now();

        match self.fetch_from(live.as_ref(), now).await {
            Ok(jobs) => {
                tracing::info!(count = jobs.len(), "Fetched jobs from Jenkins");
                Ok(Snapshot {
                    data: jobs,
                    synced_at: now,
                    source: live.metadata().kind,
                    warning: None,
                })
            }
            Err(e) if e.is_unreachable() => {
                tracing::warn!(error = %e, "Jenkins unavailable, serving synthetic data");
                let jobs = self.fetch_from(self.fallback.as_ref(), now).await?;
                Ok(Snapshot {
                    data: jobs,
                    synced_at: now,
                    source: self.fallback.metadata().kind,
                    warning: Some(DEGRADED_WARNING.to_string()),
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch jobs from Jenkins");
                Err(e.into())
            }
        }
    }

    pub async fn list(&self, query: &JobQuery) -> DomainResult<Snapshot<JobPage>> {
        self.collect().await?.try_map(|jobs| query.apply(jobs))
    }

    pub async fn overview(&self) -> DomainResult<Snapshot<FleetMetrics>> {
        let window = self.insights.active_window_days;
        let snapshot = self.collect().await?;
        let now = snapshot.synced_at;
        Ok(snapshot.map(|jobs| aggregate(&jobs, now, window)))
    }

    pub async fn cleanup(&self) -> DomainResult<Snapshot<CleanupReport>> {
        let threshold = self.insights.inactive_threshold_days;
        Ok(self
            .collect()
            .await?
            .map(|jobs| cleanup_report(&jobs, threshold)))
    }

    pub async fn performance(&self) -> DomainResult<Snapshot<PerformanceReport>> {
        Ok(self
            .collect()
            .await?
            .map(|jobs| performance_report(&jobs)))
    }

    /// Re-walks the live source and reports the job count. Never falls
    /// back to synthetic data.
    pub async fn sync(&self) -> DomainResult<SyncReport> {
        let live = self.live()?;
        let synced_at = Utc::now();

        tracing::info!("Syncing all jobs from Jenkins");
        let jobs = live.fetch_jobs().await?;
        tracing::info!(count = jobs.len(), "Sync complete");

        Ok(SyncReport {
            total: jobs.len(),
            synced_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use jobdash_source_api::{
        BuildRef,
        RawJob,
        SourceMetadata,
    };

    use super::*;

    struct StubSource {
        metadata: SourceMetadata,
        outcome: fn() -> SourceResult<Vec<RawJob>>,
    }

    impl StubSource {
        fn live(outcome: fn() -> SourceResult<Vec<RawJob>>) -> Arc<dyn JobSource> {
            Arc::new(Self {
                metadata: SourceMetadata {
                    name: "Jenkins".to_string(),
                    kind: SourceKind::Jenkins,
                    base_url: "https://ci.example.com".to_string(),
                },
                outcome,
            })
        }
    }

    #[async_trait]
    impl JobSource for StubSource {
        fn metadata(&self) -> &SourceMetadata {
            &self.metadata
        }

        async fn fetch_jobs(&self) -> SourceResult<Vec<RawJob>> {
            (self.outcome)()
        }
    }

    fn two_jobs() -> SourceResult<Vec<RawJob>> {
        Ok(vec![
            RawJob {
                name: "build".to_string(),
                url: Some("https://ci.example.com/job/teamA/job/build/".to_string()),
                last_build: Some(BuildRef {
                    number: Some(3),
                    result: Some("SUCCESS".to_string()),
                    timestamp: Some(Utc::now().timestamp_millis()),
                    duration: Some(120_000),
                    url: None,
                }),
                ..Default::default()
            },
            RawJob {
                name: "smoke-test".to_string(),
                ..Default::default()
            },
        ])
    }

    fn refused() -> SourceResult<Vec<RawJob>> {
        Err(SourceError::Unreachable("connection refused".to_string()))
    }

    fn unauthorized() -> SourceResult<Vec<RawJob>> {
        Err(SourceError::Unauthorized("401".to_string()))
    }

    fn server_error() -> SourceResult<Vec<RawJob>> {
        Err(SourceError::Api("HTTP 500".to_string()))
    }

    fn service(live: LiveSource) -> JobService {
        JobService::new(
            live,
            Arc::new(SyntheticSource::new(25, 42)),
            ClassificationRules::default(),
            100,
            InsightsConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_collect_from_live_source() {
        let service = service(LiveSource::Ready(StubSource::live(two_jobs)));
        let snapshot = service.collect().await.unwrap();

        assert!(!snapshot.is_degraded());
        assert_eq!(snapshot.warning, None);
        assert_eq!(snapshot.data.len(), 2);
        assert_eq!(snapshot.data[0].folder, "teamA");
        assert_eq!(snapshot.data[1].url, "https://ci.example.com/job/smoke-test");
        assert!(snapshot.data[1].is_test_job);
    }

    #[tokio::test]
    async fn test_unreachable_falls_back() {
        for outcome in [refused as fn() -> _, unauthorized] {
            let service = service(LiveSource::Ready(StubSource::live(outcome)));
            let snapshot = service.collect().await.unwrap();

            assert!(snapshot.is_degraded());
            assert_eq!(snapshot.warning.as_deref(), Some(DEGRADED_WARNING));
            assert_eq!(snapshot.data.len(), 25);
        }
    }

    #[tokio::test]
    async fn test_other_upstream_errors_propagate() {
        let service = service(LiveSource::Ready(StubSource::live(server_error)));
        assert!(matches!(
            service.collect().await,
            Err(DomainError::Upstream(SourceError::Api(_)))
        ));
    }

    #[tokio::test]
    async fn test_misconfigured_source_reports_config_error() {
        let service = service(LiveSource::Misconfigured("missing token".to_string()));
        assert_eq!(service.config_error(), Some("missing token"));
        assert!(matches!(
            service.overview().await,
            Err(DomainError::InvalidConfig(msg)) if msg == "missing token"
        ));
        assert!(matches!(
            service.sync().await,
            Err(DomainError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_overview_uses_aggregator() {
        let service = service(LiveSource::Ready(StubSource::live(two_jobs)));
        let overview = service.overview().await.unwrap();

        assert_eq!(overview.data.total_jobs, 2);
        assert_eq!(overview.data.success_rate, 50.0);
        assert_eq!(overview.data.active_jobs, 1);
        assert_eq!(overview.data.test_jobs, 1);
        assert_eq!(overview.data.avg_build_duration, 2);
    }

    #[tokio::test]
    async fn test_degraded_overview_is_nonempty() {
        let service = service(LiveSource::Ready(StubSource::live(refused)));
        let overview = service.overview().await.unwrap();
        assert_eq!(overview.data.total_jobs, 25);
        assert!(overview.warning.is_some());
    }

    #[tokio::test]
    async fn test_sync_does_not_fall_back() {
        let ok = service(LiveSource::Ready(StubSource::live(two_jobs)));
        assert_eq!(ok.sync().await.unwrap().total, 2);

        let down = service(LiveSource::Ready(StubSource::live(refused)));
        assert!(matches!(
            down.sync().await,
            Err(DomainError::Upstream(SourceError::Unreachable(_)))
        ));
    }

    #[tokio::test]
    async fn test_list_applies_query() {
        let service = service(LiveSource::Ready(StubSource::live(two_jobs)));
        let query = JobQuery {
            test_only: true,
            ..Default::default()
        };
        let listing = service.list(&query).await.unwrap();
        assert_eq!(listing.data.total, 1);
        assert_eq!(listing.data.jobs[0].name, "smoke-test");
    }

    #[test]
    fn test_from_config_without_credentials() {
        let service = JobService::from_config(&DashboardConfig::default());
        let reason = service.config_error().unwrap();
        assert!(reason.contains("JENKINS_BASE_URL"));
    }
}
