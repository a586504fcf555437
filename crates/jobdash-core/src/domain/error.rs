use jobdash_source_api::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Upstream error: {0}")]
    Upstream(SourceError),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<SourceError> for DomainError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::InvalidConfig(msg) => DomainError::InvalidConfig(msg),
            other => DomainError::Upstream(other),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
