use axum::{
    extract::{
        Query,
        State,
    },
    http::{
        header,
        HeaderName,
        HeaderValue,
    },
    response::{
        IntoResponse,
        Response,
    },
    routing::{
        get,
        post,
    },
    Router,
};
use jobdash_core::application::export::{
    export_filename,
    write_csv,
};
use jobdash_core::{
    JobQuery,
    JobSummary,
};

use crate::error::{
    ApiEnvelope,
    ApiResult,
    AppError,
};
use crate::state::AppState;

pub const DATA_WARNING_HEADER: &str = "x-data-warning";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/export.csv", get(export_jobs))
        .route("/sync", post(sync_jobs))
}

async fn list_jobs(
    State(state): State<AppState>, Query(query): Query<JobQuery>,
) -> ApiResult<ApiEnvelope<Vec<JobSummary>>> {
    let listing = state
        .service()?
        .list(&query)
        .await
        .map_err(|e| AppError::from(e).with_message("Failed to fetch Jenkins data"))?;

    let message = if listing.is_degraded() {
        format!(
            "Mock data: {} Jenkins jobs (Jenkins connection failed)",
            listing.data.total
        )
    } else {
        format!(
            "Retrieved {} Jenkins jobs from all folders",
            listing.data.total
        )
    };

    Ok(ApiEnvelope::ok(listing.data.jobs)
        .with_message(message)
        .with_total(listing.data.total)
        .with_last_sync(listing.synced_at)
        .with_warning(listing.warning))
}

async fn export_jobs(
    State(state): State<AppState>, Query(query): Query<JobQuery>,
) -> ApiResult<Response> {
    let listing = state
        .service()?
        .list(&query)
        .await
        .map_err(|e| AppError::from(e).with_message("Failed to export Jenkins data"))?;

    let mut body = Vec::new();
    write_csv(&mut body, &listing.data.jobs)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(listing.synced_at.date_naive())
    );

    let mut response = (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response();

    if let Some(warning) = listing.warning {
        if let Ok(value) = HeaderValue::from_str(&warning) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(DATA_WARNING_HEADER), value);
        }
    }

    Ok(response)
}

async fn sync_jobs(State(state): State<AppState>) -> ApiResult<ApiEnvelope> {
    let report = state
        .service()?
        .sync()
        .await
        .map_err(|e| AppError::from(e).with_message("Failed to sync from Jenkins"))?;

    Ok(ApiEnvelope::acknowledged(format!(
        "Successfully synced {} jobs from Jenkins (including all folders)",
        report.total
    ))
    .with_total(report.total)
    .with_last_sync(report.synced_at))
}
