use axum::{
    extract::State,
    routing::get,
    Router,
};
use jobdash_core::FleetMetrics;
use serde::Serialize;

use crate::error::{
    ApiEnvelope,
    ApiResult,
    AppError,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    #[serde(flatten)]
    pub metrics: FleetMetrics,
    pub last_sync_time: String,
}

#[derive(Debug, Serialize)]
pub struct Widget {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub widget_type: &'static str,
    pub config: serde_json::Value,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/widgets", get(widgets))
}

async fn overview(State(state): State<AppState>) -> ApiResult<ApiEnvelope<Overview>> {
    let snapshot = state
        .service()?
        .overview()
        .await
        .map_err(|e| AppError::from(e).with_message("Failed to fetch dashboard data"))?;

    let last_sync_time = if snapshot.is_degraded() {
        "Mock data - check Jenkins configuration"
    } else {
        "Just now"
    };

    Ok(ApiEnvelope::ok(Overview {
        metrics: snapshot.data,
        last_sync_time: last_sync_time.to_string(),
    })
    .with_last_sync(snapshot.synced_at)
    .with_warning(snapshot.warning))
}

async fn widgets() -> ApiEnvelope<Vec<Widget>> {
    ApiEnvelope::ok(vec![
        Widget {
            id: "1",
            name: "Job Status",
            widget_type: "chart",
            config: serde_json::json!({}),
        },
        Widget {
            id: "2",
            name: "Build Duration",
            widget_type: "chart",
            config: serde_json::json!({}),
        },
    ])
}
