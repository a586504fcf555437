use axum::{
    extract::State,
    routing::get,
    Router,
};
use jobdash_core::domain::{
    CleanupReport,
    PerformanceReport,
};

use crate::error::{
    ApiEnvelope,
    ApiResult,
    AppError,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cleanup", get(cleanup))
        .route("/performance", get(performance))
}

async fn cleanup(State(state): State<AppState>) -> ApiResult<ApiEnvelope<CleanupReport>> {
    let snapshot = state
        .service()?
        .cleanup()
        .await
        .map_err(|e| AppError::from(e).with_message("Failed to compute cleanup insights"))?;

    Ok(ApiEnvelope::ok(snapshot.data)
        .with_last_sync(snapshot.synced_at)
        .with_warning(snapshot.warning))
}

async fn performance(State(state): State<AppState>) -> ApiResult<ApiEnvelope<PerformanceReport>> {
    let snapshot = state
        .service()?
        .performance()
        .await
        .map_err(|e| AppError::from(e).with_message("Failed to compute performance analytics"))?;

    Ok(ApiEnvelope::ok(snapshot.data)
        .with_last_sync(snapshot.synced_at)
        .with_warning(snapshot.warning))
}
