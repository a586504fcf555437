use std::cmp::Ordering;

use serde::{
    Deserialize,
    Serialize,
};

use crate::domain::{
    BuildStatus,
    DomainError,
    DomainResult,
    JobSummary,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Name,
    Status,
    Duration,
    LastBuild,
    SuccessRate,
    Folder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Filter, sort and page parameters for the job list.
///
/// `status` and `folder` accept `"all"` as a no-op. Without `page_size`
/// the whole filtered list is returned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub folder: Option<String>,
    pub test_only: bool,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: usize,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct JobPage {
    /// Matching jobs before paging
    pub total: usize,
    pub jobs: Vec<JobSummary>,
}

fn non_trivial(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl JobQuery {
    fn status_filter(&self) -> DomainResult<Option<BuildStatus>> {
        non_trivial(&self.status)
            .map(|s| s.parse::<BuildStatus>().map_err(DomainError::InvalidQuery))
            .transpose()
    }

    pub fn apply(&self, jobs: Vec<JobSummary>) -> DomainResult<JobPage> {
        if self.page_size == Some(0) {
            return Err(DomainError::InvalidQuery(
                "pageSize must be greater than zero".to_string(),
            ));
        }

        let status = self.status_filter()?;
        let search = non_trivial(&self.search).map(str::to_lowercase);
        let folder = non_trivial(&self.folder);

        let mut matched: Vec<JobSummary> = jobs
            .into_iter()
            .filter(|job| {
                search
                    .as_deref()
                    .is_none_or(|needle| job.name.to_lowercase().contains(needle))
            })
            .filter(|job| status.is_none_or(|s| job.last_build_status == s))
            .filter(|job| folder.is_none_or(|f| job.folder == f))
            .filter(|job| !self.test_only || job.is_test_job)
            .collect();

        matched.sort_by(|a, b| {
            let ordering = compare(self.sort_by, a, b).then_with(|| a.id.cmp(&b.id));
            match self.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matched.len();
        let jobs = match self.page_size {
            Some(size) => matched
                .into_iter()
                .skip(self.page.saturating_mul(size))
                .take(size)
                .collect(),
            None => matched,
        };

        Ok(JobPage { total, jobs })
    }
}

fn compare(field: SortField, a: &JobSummary, b: &JobSummary) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Status => a.last_build_status.as_str().cmp(b.last_build_status.as_str()),
        SortField::Duration => a.last_build_duration.cmp(&b.last_build_duration),
        SortField::LastBuild => a.last_build_date.cmp(&b.last_build_date),
        SortField::SuccessRate => a
            .success_rate
            .partial_cmp(&b.success_rate)
            .unwrap_or(Ordering::Equal),
        SortField::Folder => a.folder.cmp(&b.folder),
    }
}
