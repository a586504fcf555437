mod analytics;
pub mod auth;
mod dashboard;
pub mod health;
mod jenkins;
mod webhooks;

use axum::{
    middleware,
    routing::get,
    Router,
};

use crate::state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/jenkins", jenkins::router())
        .nest("/dashboard", dashboard::router())
        .nest("/analytics", analytics::router())
        .nest("/webhooks", webhooks::router())
}

/// `/health` plus everything under `/api`, with the stub identity attached.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest(
            "/api",
            api_router().layer(middleware::from_fn(auth::auth_middleware)),
        )
        .with_state(state)
}
