use chrono::{
    DateTime,
    Duration,
    Utc,
};

use super::normalizer::round1;
use crate::domain::{
    BuildStatus,
    FleetMetrics,
    JobSummary,
};

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(part as f64 / total as f64 * 100.0)
    }
}

/// Computes fleet-wide metrics from normalized jobs.
///
/// Status rates bucket jobs by their last build status; the four rates may
/// sum to less than 100 when jobs are in progress or never built. A job is
/// active when its last build falls within `active_window_days` of `now`.
pub fn aggregate(jobs: &[JobSummary], now: DateTime<Utc>, active_window_days: i64) -> FleetMetrics {
    let total_jobs = jobs.len();
    // A window reaching past the representable range counts every build.
    let active_since =
        Duration::try_days(active_window_days).and_then(|window| now.checked_sub_signed(window));

    let count_status = |status: BuildStatus| {
        jobs.iter()
            .filter(|job| job.last_build_status == status)
            .count()
    };

    let durations: Vec<i64> = jobs
        .iter()
        .map(|job| job.last_build_duration)
        .filter(|d| *d > 0)
        .collect();
    let avg_build_duration = if durations.is_empty() {
        0
    } else {
        let mean_ms = durations.iter().sum::<i64>() as f64 / durations.len() as f64;
        (mean_ms / 60_000.0).round() as i64
    };

    FleetMetrics {
        total_jobs,
        success_rate: percent(count_status(BuildStatus::Success), total_jobs),
        failure_rate: percent(count_status(BuildStatus::Failure), total_jobs),
        unstable_rate: percent(count_status(BuildStatus::Unstable), total_jobs),
        aborted_rate: percent(count_status(BuildStatus::Aborted), total_jobs),
        avg_build_duration,
        active_jobs: jobs
            .iter()
            .filter(|job| {
                job.last_build_date
                    .is_some_and(|d| active_since.is_none_or(|since| d >= since))
            })
            .count(),
        disabled_jobs: jobs.iter().filter(|job| job.is_disabled).count(),
        test_jobs: jobs.iter().filter(|job| job.is_test_job).count(),
    }
}
