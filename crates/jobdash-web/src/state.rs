use std::sync::Arc;

use jobdash_core::JobService;

use crate::error::{
    ApiResult,
    AppError,
};

#[derive(Clone)]
pub struct AppState {
    service: Option<Arc<JobService>>,
    config_error: Option<String>,
}

impl AppState {
    pub fn initialized(service: JobService) -> Self {
        Self {
            service: Some(Arc::new(service)),
            config_error: None,
        }
    }

    /// The config file could not be loaded; data endpoints report `error`.
    pub fn config_error(error: String) -> Self {
        Self {
            service: None,
            config_error: Some(error),
        }
    }

    pub fn service(&self) -> ApiResult<&JobService> {
        match (&self.service, &self.config_error) {
            (Some(service), _) => Ok(service),
            (None, error) => Err(AppError::internal(
                error
                    .clone()
                    .unwrap_or_else(|| "Service not initialized".to_string()),
            )
            .with_message("Configuration error")),
        }
    }

    pub fn config_problem(&self) -> Option<&str> {
        self.config_error.as_deref().or_else(|| {
            self.service
                .as_ref()
                .and_then(|service| service.config_error())
        })
    }
}
