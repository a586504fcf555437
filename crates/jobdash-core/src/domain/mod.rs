pub mod error;
pub mod job;
pub mod metrics;

pub use error::{
    DomainError,
    DomainResult,
};
pub use job::{
    BuildStatus,
    JobSummary,
};
pub use metrics::{
    Bucket,
    CleanupCandidate,
    CleanupReport,
    CleanupSummary,
    FleetMetrics,
    JobPerformance,
    PerformanceReport,
};
