pub mod aggregator;
pub mod export;
pub mod insights;
pub mod normalizer;
pub mod query;
pub mod services;

pub use aggregator::aggregate;
pub use normalizer::JobNormalizer;
pub use query::{
    JobPage,
    JobQuery,
    SortField,
    SortOrder,
};
pub use services::job_service::{
    JobService,
    LiveSource,
    Snapshot,
    SyncReport,
    DEGRADED_WARNING,
};
