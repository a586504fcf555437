//! Seeded job generator used when the live Jenkins source is unreachable.

use async_trait::async_trait;
use chrono::{
    DateTime,
    Duration,
    Utc,
};
use jobdash_source_api::{
    BuildRef,
    JobSource,
    RawBuild,
    RawJob,
    SourceKind,
    SourceMetadata,
    SourceResult,
};
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};

pub const SYNTHETIC_BASE_URL: &str = "https://jenkins.example.com";

const PREFIXES: [&str; 9] = [
    "frontend",
    "backend",
    "api",
    "mobile",
    "web",
    "service",
    "microservice",
    "database",
    "infrastructure",
];

const JOB_TYPES: [&str; 7] = [
    "build",
    "test",
    "deploy",
    "integration",
    "release",
    "hotfix",
    "feature",
];

const RESULTS: [Option<&str>; 5] = [
    Some("SUCCESS"),
    Some("FAILURE"),
    Some("UNSTABLE"),
    Some("ABORTED"),
    None,
];

const WORKFLOW_JOB_CLASS: &str = "org.jenkinsci.plugins.workflow.job.WorkflowJob";
const FREESTYLE_JOB_CLASS: &str = "hudson.model.FreeStyleProject";

/// Produces the same fleet for the same seed, count and clock.
pub struct SyntheticSource {
    metadata: SourceMetadata,
    job_count: usize,
    seed: u64,
}

impl SyntheticSource {
    pub fn new(job_count: usize, seed: u64) -> Self {
        Self {
            metadata: SourceMetadata {
                name: "Synthetic".to_string(),
                kind: SourceKind::Synthetic,
                base_url: SYNTHETIC_BASE_URL.to_string(),
            },
            job_count,
            seed,
        }
    }

    pub fn generate(&self, now: DateTime<Utc>) -> Vec<RawJob> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (1..=self.job_count)
            .map(|i| generate_job(&mut rng, i, now))
            .collect()
    }
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

fn random_duration_ms(rng: &mut StdRng) -> i64 {
    let minutes: i64 = rng.random_range(1..=30);
    let seconds: i64 = rng.random_range(0..60);
    (minutes * 60 + seconds) * 1000
}

/// Most jobs ran within the last day; the rest are spread over months so
/// inactivity reports have something to show.
fn random_age(rng: &mut StdRng) -> Duration {
    if rng.random_bool(0.7) {
        Duration::minutes(rng.random_range(1..=24 * 60))
    } else {
        Duration::days(rng.random_range(2..=240))
    }
}

fn color_for(result: Option<&str>, disabled: bool) -> &'static str {
    if disabled {
        return "disabled";
    }
    match result {
        Some("SUCCESS") => "blue",
        Some("FAILURE") => "red",
        Some("UNSTABLE") => "yellow",
        Some("ABORTED") => "aborted",
        _ => "notbuilt",
    }
}

fn generate_job(rng: &mut StdRng, index: usize, now: DateTime<Utc>) -> RawJob {
    let prefix = *pick(rng, &PREFIXES);
    let job_type = *pick(rng, &JOB_TYPES);
    let result = *pick(rng, &RESULTS);
    let disabled = rng.random_bool(0.05);

    let name = format!("{}-{}-{}", prefix, job_type, index);
    let url = format!("{}/job/{}/job/{}/", SYNTHETIC_BASE_URL, prefix, name);
    let class = if rng.random_bool(0.8) {
        WORKFLOW_JOB_CLASS
    } else {
        FREESTYLE_JOB_CLASS
    };

    let mut job = RawJob {
        name,
        class: Some(class.to_string()),
        buildable: Some(!disabled),
        color: Some(color_for(result, disabled).to_string()),
        in_queue: Some(false),
        builds: Some(Vec::new()),
        ..Default::default()
    };

    // Never built: no history at all
    let Some(result) = result else {
        job.url = Some(url);
        return job;
    };

    let build_count: i64 = rng.random_range(5..=20);
    let mut started = now - random_age(rng);

    let mut builds = Vec::with_capacity(build_count as usize);
    let mut last_success: Option<BuildRef> = None;
    let mut last_failure: Option<BuildRef> = None;

    // Newest first, as Jenkins lists them
    for offset in 0..build_count {
        let number = build_count - offset;
        if offset > 0 {
            started -= Duration::hours(rng.random_range(2..=12));
        }
        let duration = random_duration_ms(rng);
        let build_result = if offset == 0 {
            result
        } else if rng.random_bool(0.75) {
            "SUCCESS"
        } else {
            *pick(rng, &["FAILURE", "UNSTABLE", "ABORTED"])
        };

        let build_ref = BuildRef {
            number: Some(number),
            result: Some(build_result.to_string()),
            timestamp: Some(started.timestamp_millis()),
            duration: Some(duration),
            url: Some(format!("{}{}/", url, number)),
        };

        if build_result == "SUCCESS" {
            last_success.get_or_insert_with(|| build_ref.clone());
        } else if build_result == "FAILURE" {
            last_failure.get_or_insert_with(|| build_ref.clone());
        }
        if offset == 0 {
            job.last_build = Some(build_ref);
        }

        builds.push(RawBuild {
            timestamp: Some(started.timestamp_millis()),
            result: Some(build_result.to_string()),
            duration: Some(duration),
        });
    }

    job.url = Some(url);
    job.builds = Some(builds);
    job.last_successful_build = last_success;
    job.last_failed_build = last_failure;
    job
}

#[async_trait]
impl JobSource for SyntheticSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    async fn fetch_jobs(&self) -> SourceResult<Vec<RawJob>> {
        let jobs = self.generate(Utc::now());
        tracing::debug!(count = jobs.len(), seed = self.seed, "Generated synthetic jobs");
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_generation_is_deterministic() {
        let source = SyntheticSource::new(50, 7);
        assert_eq!(source.generate(now()), source.generate(now()));

        let other = SyntheticSource::new(50, 8);
        assert_ne!(source.generate(now()), other.generate(now()));
    }

    #[test]
    fn test_generated_shape() {
        let jobs = SyntheticSource::new(200, 42).generate(now());
        assert_eq!(jobs.len(), 200);

        let names: HashSet<&str> = jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names.len(), 200);

        for job in &jobs {
            assert!(!job.is_folder());
            let url = job.url.as_deref().unwrap();
            assert!(url.starts_with("https://jenkins.example.com/job/"));
            assert!(url.ends_with(&format!("/job/{}/", job.name)));

            match &job.last_build {
                Some(last) => {
                    let count = job.builds().len();
                    assert!((5..=20).contains(&count));
                    assert_eq!(last.number, Some(count as i64));
                    assert!(last.timestamp.unwrap() < now().timestamp_millis());
                    for build in job.builds() {
                        let duration = build.duration.unwrap();
                        assert!((60_000..=30 * 60_000 + 59_000).contains(&duration));
                    }
                }
                None => assert!(job.builds().is_empty()),
            }
        }

        assert!(jobs.iter().any(|j| j.buildable == Some(false)));
        assert!(jobs.iter().any(|j| j.last_build.is_none()));
    }

    #[tokio::test]
    async fn test_source_metadata_and_fetch() {
        let source = SyntheticSource::new(10, 1);
        assert!(source.metadata().is_synthetic());
        assert_eq!(source.metadata().base_url, SYNTHETIC_BASE_URL);
        assert_eq!(source.fetch_jobs().await.unwrap().len(), 10);
    }
}
