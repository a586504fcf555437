//! Job normalization, fleet metrics and degraded-mode selection for the
//! Jenkins dashboard, independent of the HTTP layer.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::{
    JobQuery,
    JobService,
    Snapshot,
    SyncReport,
};
pub use domain::{
    BuildStatus,
    DomainError,
    DomainResult,
    FleetMetrics,
    JobSummary,
};
pub use infrastructure::{
    ConfigLoader,
    DashboardConfig,
};
