//! Cleanup and performance reports derived from the job list.

use std::cmp::Ordering;

use crate::domain::{
    Bucket,
    CleanupCandidate,
    CleanupReport,
    CleanupSummary,
    JobPerformance,
    JobSummary,
    PerformanceReport,
};

/// Entries shown per cleanup list; summary totals are not truncated.
pub const CLEANUP_LIST_LIMIT: usize = 20;
pub const TOP_JOBS_LIMIT: usize = 10;

const DURATION_BUCKETS: [(&str, i64); 5] = [
    ("< 1m", 60_000),
    ("1-5m", 5 * 60_000),
    ("5-15m", 15 * 60_000),
    ("15-30m", 30 * 60_000),
    ("> 30m", i64::MAX),
];

const SUCCESS_RATE_BUCKETS: [(&str, f64); 4] = [
    ("0-50%", 50.0),
    ("50-80%", 80.0),
    ("80-95%", 95.0),
    ("95-100%", f64::INFINITY),
];

fn candidate(job: &JobSummary, recommendation: &str) -> CleanupCandidate {
    CleanupCandidate {
        name: job.name.clone(),
        folder: job.folder.clone(),
        url: job.url.clone(),
        last_build: job.last_build.clone(),
        days_since_last_build: job.days_since_last_build,
        recommendation: recommendation.to_string(),
    }
}

fn older_than(job: &JobSummary, days: i64) -> bool {
    job.days_since_last_build.is_none_or(|d| d > days)
}

/// Builds the cleanup report.
///
/// A job is inactive when its last build is at least
/// `inactive_threshold_days` old; never-built jobs are not counted as
/// inactive. Lists are ordered stalest first.
pub fn cleanup_report(jobs: &[JobSummary], inactive_threshold_days: i64) -> CleanupReport {
    let mut stalest_first: Vec<&JobSummary> = jobs.iter().collect();
    stalest_first.sort_by(|a, b| {
        let a_days = a.days_since_last_build.unwrap_or(i64::MAX);
        let b_days = b.days_since_last_build.unwrap_or(i64::MAX);
        b_days.cmp(&a_days).then_with(|| a.name.cmp(&b.name))
    });

    let test_jobs: Vec<CleanupCandidate> = stalest_first
        .iter()
        .filter(|job| job.is_test_job)
        .map(|job| {
            if older_than(job, 30) {
                candidate(job, "Safe to delete")
            } else {
                candidate(job, "Review before deletion")
            }
        })
        .collect();

    let inactive_jobs: Vec<CleanupCandidate> = stalest_first
        .iter()
        .filter(|job| {
            job.days_since_last_build
                .is_some_and(|d| d >= inactive_threshold_days)
        })
        .map(|job| {
            if older_than(job, 120) {
                candidate(job, "Archive and delete")
            } else {
                candidate(job, "Safe to delete")
            }
        })
        .collect();

    let disabled_jobs: Vec<CleanupCandidate> = stalest_first
        .iter()
        .filter(|job| job.is_disabled)
        .map(|job| {
            if older_than(job, 45) {
                candidate(job, "Safe to delete")
            } else {
                candidate(job, "Review before deletion")
            }
        })
        .collect();

    let summary = CleanupSummary {
        total_test_jobs: test_jobs.len(),
        total_inactive_jobs: inactive_jobs.len(),
        total_disabled_jobs: disabled_jobs.len(),
        potential_savings: format!(
            "{} jobs",
            (test_jobs.len() + inactive_jobs.len() + disabled_jobs.len()) / 2
        ),
    };

    let truncate = |mut list: Vec<CleanupCandidate>| {
        list.truncate(CLEANUP_LIST_LIMIT);
        list
    };

    CleanupReport {
        test_jobs: truncate(test_jobs),
        inactive_jobs: truncate(inactive_jobs),
        disabled_jobs: truncate(disabled_jobs),
        summary,
    }
}

fn performance(job: &JobSummary) -> JobPerformance {
    JobPerformance {
        name: job.name.clone(),
        folder: job.folder.clone(),
        avg_build_duration: job.avg_build_duration,
        success_rate: job.success_rate,
        total_builds: job.total_builds,
    }
}

pub fn performance_report(jobs: &[JobSummary]) -> PerformanceReport {
    let mut duration_counts = [0usize; DURATION_BUCKETS.len()];
    let mut rate_counts = [0usize; SUCCESS_RATE_BUCKETS.len()];

    let built: Vec<&JobSummary> = jobs.iter().filter(|job| job.total_builds > 0).collect();

    for job in jobs.iter().filter(|job| job.avg_build_duration > 0) {
        if let Some(idx) = DURATION_BUCKETS
            .iter()
            .position(|(_, upper)| job.avg_build_duration < *upper)
        {
            duration_counts[idx] += 1;
        }
    }

    for job in &built {
        if let Some(idx) = SUCCESS_RATE_BUCKETS
            .iter()
            .position(|(_, upper)| job.success_rate < *upper)
        {
            rate_counts[idx] += 1;
        }
    }

    let mut slowest: Vec<&JobSummary> = jobs
        .iter()
        .filter(|job| job.avg_build_duration > 0)
        .collect();
    slowest.sort_by(|a, b| {
        b.avg_build_duration
            .cmp(&a.avg_build_duration)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut least_reliable = built;
    least_reliable.sort_by(|a, b| {
        a.success_rate
            .partial_cmp(&b.success_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.total_builds.cmp(&a.total_builds))
            .then_with(|| a.name.cmp(&b.name))
    });

    PerformanceReport {
        duration_buckets: DURATION_BUCKETS
            .iter()
            .zip(duration_counts)
            .map(|((label, _), count)| Bucket {
                label: label.to_string(),
                count,
            })
            .collect(),
        success_rate_buckets: SUCCESS_RATE_BUCKETS
            .iter()
            .zip(rate_counts)
            .map(|((label, _), count)| Bucket {
                label: label.to_string(),
                count,
            })
            .collect(),
        slowest_jobs: slowest
            .into_iter()
            .take(TOP_JOBS_LIMIT)
            .map(performance)
            .collect(),
        least_reliable_jobs: least_reliable
            .into_iter()
            .take(TOP_JOBS_LIMIT)
            .map(performance)
            .collect(),
    }
}
