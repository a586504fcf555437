use axum::{
    http::StatusCode,
    response::{
        IntoResponse,
        Response,
    },
    Json,
};
use chrono::{
    DateTime,
    Utc,
};
use jobdash_core::DomainError;
use serde::Serialize;

/// Response body shared by every `/api` endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T = ()> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
}

impl<T> ApiEnvelope<T> {
    fn empty(success: bool) -> Self {
        Self {
            success,
            data: None,
            message: None,
            error: None,
            warning: None,
            total: None,
            last_sync: None,
        }
    }

    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::empty(true)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_last_sync(mut self, last_sync: DateTime<Utc>) -> Self {
        self.last_sync = Some(last_sync);
        self
    }
}

impl ApiEnvelope {
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self::empty(true).with_message(message)
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            error,
            ..Self::empty(false).with_message(message)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiEnvelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub body: ApiEnvelope,
}

impl AppError {
    pub fn new(status: StatusCode, body: ApiEnvelope) -> Self {
        Self { status, body }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiEnvelope::failure("Invalid request", Some(message)),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiEnvelope::failure("Server error", Some(message)),
        )
    }

    /// Replaces the summary message, keeping status and error detail.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        if self.status.is_server_error() {
            self.body.message = Some(message.into());
        }
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::InvalidQuery(msg) => AppError::bad_request(msg.clone()),
            DomainError::InvalidConfig(msg) => AppError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiEnvelope::failure("Jenkins configuration error", Some(msg.clone())),
            ),
            _ => AppError::internal(err.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, AppError>;
