use serde::{
    Deserialize,
    Serialize,
};

/// Fleet-wide figures derived from the current job list.
///
/// Rates are percentages of `total_jobs` rounded to one decimal and are zero
/// for an empty fleet. `avg_build_duration` is in whole minutes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetMetrics {
    pub total_jobs: usize,
    pub success_rate: f64,
    pub failure_rate: f64,
    pub unstable_rate: f64,
    pub aborted_rate: f64,
    pub avg_build_duration: i64,
    pub active_jobs: usize,
    pub disabled_jobs: usize,
    pub test_jobs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupCandidate {
    pub name: String,
    pub folder: String,
    pub url: String,
    pub last_build: String,
    pub days_since_last_build: Option<i64>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupSummary {
    pub total_test_jobs: usize,
    pub total_inactive_jobs: usize,
    pub total_disabled_jobs: usize,
    pub potential_savings: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub test_jobs: Vec<CleanupCandidate>,
    pub inactive_jobs: Vec<CleanupCandidate>,
    pub disabled_jobs: Vec<CleanupCandidate>,
    pub summary: CleanupSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPerformance {
    pub name: String,
    pub folder: String,
    pub avg_build_duration: i64,
    pub success_rate: f64,
    pub total_builds: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    /// Jobs grouped by average build duration
    pub duration_buckets: Vec<Bucket>,
    /// Jobs with build history grouped by success rate
    pub success_rate_buckets: Vec<Bucket>,
    pub slowest_jobs: Vec<JobPerformance>,
    pub least_reliable_jobs: Vec<JobPerformance>,
}
