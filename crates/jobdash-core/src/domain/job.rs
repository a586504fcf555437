use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildStatus {
    Success,
    Failure,
    Unstable,
    Aborted,
    InProgress,
    NotBuilt,
}

impl BuildStatus {
    pub const ALL: [BuildStatus; 6] = [
        BuildStatus::Success,
        BuildStatus::Failure,
        BuildStatus::Unstable,
        BuildStatus::Aborted,
        BuildStatus::InProgress,
        BuildStatus::NotBuilt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::Success => "SUCCESS",
            BuildStatus::Failure => "FAILURE",
            BuildStatus::Unstable => "UNSTABLE",
            BuildStatus::Aborted => "ABORTED",
            BuildStatus::InProgress => "IN_PROGRESS",
            BuildStatus::NotBuilt => "NOT_BUILT",
        }
    }

    /// Whether a build with this result counts toward the failure tally.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            BuildStatus::Failure | BuildStatus::Unstable | BuildStatus::Aborted
        )
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BuildStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "SUCCESS" => Ok(BuildStatus::Success),
            "FAILURE" => Ok(BuildStatus::Failure),
            "UNSTABLE" => Ok(BuildStatus::Unstable),
            "ABORTED" => Ok(BuildStatus::Aborted),
            "IN_PROGRESS" => Ok(BuildStatus::InProgress),
            "NOT_BUILT" => Ok(BuildStatus::NotBuilt),
            _ => Err(format!("Unknown build status: {}", s)),
        }
    }
}

/// Canonical per-job summary served to the dashboard.
///
/// Durations are milliseconds. Aggregates over the build window only
/// consider builds with a strictly positive duration, so
/// `success_count + failure_count <= total_builds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub folder: String,

    pub last_build_status: BuildStatus,
    pub last_build_url: String,
    pub last_build_number: i64,
    pub last_successful_build: Option<i64>,
    pub last_failed_build: Option<i64>,
    pub is_disabled: bool,
    pub buildable: bool,
    pub in_queue: bool,
    pub color: String,

    pub last_build_date: Option<DateTime<Utc>>,
    pub last_successful_date: Option<DateTime<Utc>>,
    pub last_failed_date: Option<DateTime<Utc>>,
    pub days_since_last_build: Option<i64>,

    pub total_builds: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub success_rate: f64,

    pub last_build_duration: i64,
    pub last_successful_duration: i64,
    pub last_failed_duration: i64,
    pub avg_build_duration: i64,
    pub avg_successful_duration: i64,
    pub avg_failed_duration: i64,
    pub min_build_duration: i64,
    pub max_build_duration: i64,
    pub total_build_duration: i64,

    pub is_test_job: bool,

    /// Relative time of the last build, e.g. "3 days ago"
    pub last_build: String,
    /// Last build duration, e.g. "4m 12s"
    pub duration: String,
}
