//! Raw Jenkins job records to `JobSummary`

use chrono::{
    DateTime,
    Utc,
};
use jobdash_source_api::{
    folder_from_url,
    BuildRef,
    ClassificationRules,
    RawJob,
};

use crate::domain::{
    BuildStatus,
    JobSummary,
};

const MS_PER_DAY: i64 = 86_400_000;

/// Converts raw job records into summaries.
///
/// Pure given its inputs: the clock is captured at construction, so
/// normalizing the same record twice yields identical summaries.
pub struct JobNormalizer<'a> {
    base_url: &'a str,
    rules: &'a ClassificationRules,
    max_builds: usize,
    now: DateTime<Utc>,
}

#[derive(Default)]
struct DurationStats {
    count: usize,
    total: i64,
    min: i64,
    max: i64,
}

impl DurationStats {
    fn push(&mut self, duration: i64) {
        if self.count == 0 {
            self.min = duration;
            self.max = duration;
        } else {
            self.min = self.min.min(duration);
            self.max = self.max.max(duration);
        }
        self.count += 1;
        self.total += duration;
    }

    fn mean(&self) -> i64 {
        if self.count == 0 {
            0
        } else {
            (self.total as f64 / self.count as f64).round() as i64
        }
    }
}

impl<'a> JobNormalizer<'a> {
    pub fn new(
        base_url: &'a str, rules: &'a ClassificationRules, max_builds: usize, now: DateTime<Utc>,
    ) -> Self {
        Self {
            base_url,
            rules,
            max_builds,
            now,
        }
    }

    pub fn normalize_all(&self, jobs: &[RawJob]) -> Vec<JobSummary> {
        jobs.iter().map(|job| self.normalize(job)).collect()
    }

    pub fn normalize(&self, job: &RawJob) -> JobSummary {
        let url = match job.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("{}/job/{}", self.base_url.trim_end_matches('/'), job.name),
        };
        let folder = folder_from_url(&url);

        let last_build = job.last_build.as_ref();
        let last_build_status = match last_build {
            Some(build) => match build.result.as_deref() {
                Some(result) => result.parse().unwrap_or_else(|_| {
                    tracing::debug!(job = %job.name, result, "Unrecognized build result");
                    BuildStatus::NotBuilt
                }),
                None => BuildStatus::InProgress,
            },
            None => BuildStatus::NotBuilt,
        };

        let last_build_date = last_build.and_then(build_date);
        let days_since_last_build = last_build_date
            .map(|date| (self.now - date).num_milliseconds().div_euclid(MS_PER_DAY));

        let mut total_builds = 0usize;
        let mut success_count = 0usize;
        let mut failure_count = 0usize;
        let mut all = DurationStats::default();
        let mut successful = DurationStats::default();
        let mut failed = DurationStats::default();

        for build in job.builds().iter().take(self.max_builds) {
            total_builds += 1;

            let duration = build.duration.unwrap_or(0);
            if duration <= 0 {
                continue;
            }
            all.push(duration);

            match build.result.as_deref().and_then(|r| r.parse::<BuildStatus>().ok()) {
                Some(BuildStatus::Success) => {
                    success_count += 1;
                    successful.push(duration);
                }
                Some(status) if status.is_failure() => {
                    failure_count += 1;
                    failed.push(duration);
                }
                _ => {}
            }
        }

        let success_rate = if total_builds > 0 {
            round1(success_count as f64 / total_builds as f64 * 100.0)
        } else {
            0.0
        };

        let last_build_duration = last_build.map(build_duration).unwrap_or(0);
        let last_build_number = last_build.and_then(|b| b.number).unwrap_or(0);

        let id = if folder == "/" {
            job.name.clone()
        } else {
            format!("{}/{}", folder, job.name)
        };

        JobSummary {
            id,
            name: job.name.clone(),
            job_type: job.class.clone().unwrap_or_default(),
            folder,
            last_build_status,
            last_build_url: last_build
                .and_then(|b| b.url.clone())
                .unwrap_or_default(),
            last_build_number,
            last_successful_build: job.last_successful_build.as_ref().and_then(|b| b.number),
            last_failed_build: job.last_failed_build.as_ref().and_then(|b| b.number),
            is_disabled: job.buildable == Some(false),
            buildable: job.buildable != Some(false),
            in_queue: job.in_queue.unwrap_or(false),
            color: job.color.clone().unwrap_or_else(|| "grey".to_string()),

            last_build_date,
            last_successful_date: job.last_successful_build.as_ref().and_then(build_date),
            last_failed_date: job.last_failed_build.as_ref().and_then(build_date),
            days_since_last_build,

            total_builds,
            success_count,
            failure_count,
            success_rate,

            last_build_duration,
            last_successful_duration: job
                .last_successful_build
                .as_ref()
                .map(build_duration)
                .unwrap_or(0),
            last_failed_duration: job
                .last_failed_build
                .as_ref()
                .map(build_duration)
                .unwrap_or(0),
            avg_build_duration: all.mean(),
            avg_successful_duration: successful.mean(),
            avg_failed_duration: failed.mean(),
            min_build_duration: all.min,
            max_build_duration: all.max,
            total_build_duration: all.total,

            is_test_job: self.rules.is_test_job(&job.name),

            last_build: match last_build_date {
                Some(date) => format_time_ago(date, self.now),
                None => "Never built".to_string(),
            },
            duration: format_duration(last_build_duration),
            url,
        }
    }
}

fn build_date(build: &BuildRef) -> Option<DateTime<Utc>> {
    build
        .timestamp
        .filter(|ts| *ts > 0)
        .and_then(DateTime::from_timestamp_millis)
}

fn build_duration(build: &BuildRef) -> i64 {
    build.duration.unwrap_or(0).max(0)
}

/// Rounds to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// "Mm Ss", or "N/A" for a zero duration.
pub fn format_duration(duration_ms: i64) -> String {
    if duration_ms <= 0 {
        return "N/A".to_string();
    }
    let minutes = duration_ms / 60_000;
    let seconds = (duration_ms % 60_000) / 1000;
    format!("{minutes}m {seconds}s")
}

pub fn format_time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - date).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    let plural = |n: i64| if n > 1 { "s" } else { "" };

    if days > 0 {
        format!("{} day{} ago", days, plural(days))
    } else if hours > 0 {
        format!("{} hour{} ago", hours, plural(hours))
    } else if minutes > 0 {
        format!("{} minute{} ago", minutes, plural(minutes))
    } else {
        "Just now".to_string()
    }
}
