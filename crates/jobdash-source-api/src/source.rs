use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::SourceResult;
use crate::types::RawJob;

/// Where a source gets its jobs from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A live Jenkins installation
    Jenkins,
    /// Generated data served when the live source is unavailable
    Synthetic,
}

/// Source metadata - describes a job source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Display name (e.g., "Jenkins")
    pub name: String,
    /// Source kind
    pub kind: SourceKind,
    /// Base address job URLs are synthesized from when a record lacks one
    pub base_url: String,
}

impl SourceMetadata {
    pub fn is_synthetic(&self) -> bool {
        self.kind == SourceKind::Synthetic
    }
}

/// A provider of flattened leaf job records.
///
/// Live and synthetic data both enter the normalization pipeline through
/// this trait, so the rest of the system never branches on where the
/// records came from.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Get source metadata
    fn metadata(&self) -> &SourceMetadata;

    /// Fetch every leaf job reachable from the root, folders expanded
    async fn fetch_jobs(&self) -> SourceResult<Vec<RawJob>>;
}
