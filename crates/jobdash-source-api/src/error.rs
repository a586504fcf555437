use thiserror::Error;

/// Job source error types
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SourceError {
    /// Whether the upstream should be treated as unavailable, in which case
    /// callers serve synthetic data instead of failing.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::Unauthorized(_))
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err.to_string())
    }
}
