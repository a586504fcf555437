use axum::{
    body::Bytes,
    routing::post,
    Router,
};

use crate::error::ApiEnvelope;
use crate::state::AppState;

const LOGGED_BODY_LIMIT: usize = 2048;

pub fn router() -> Router<AppState> {
    Router::new().route("/jenkins", post(jenkins_webhook))
}

/// Acknowledges and logs; triggers nothing.
async fn jenkins_webhook(body: Bytes) -> ApiEnvelope {
    let text = String::from_utf8_lossy(&body[..body.len().min(LOGGED_BODY_LIMIT)]);
    tracing::info!(bytes = body.len(), payload = %text, "Jenkins webhook received");
    ApiEnvelope::acknowledged("Webhook received")
}
