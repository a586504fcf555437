mod error;
mod routes;
mod state;

use std::net::SocketAddr;

use anyhow::Context;
use axum::http::HeaderValue;
use jobdash_core::infrastructure::config::ServerConfig;
use jobdash_core::{
    ConfigLoader,
    DashboardConfig,
    JobService,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{
    Any,
    CorsLayer,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

fn cors_layer(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    Ok(match origin {
        Some(origin) => layer.allow_origin(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))?,
        ),
        None => layer.allow_origin(Any),
    })
}

/// Loads configuration. Problems with the file or its values do not stop
/// the server; data endpoints report them instead.
fn load_state() -> (AppState, ServerConfig) {
    match ConfigLoader::load_default() {
        Ok(config) => {
            let validation = config.validate();
            for warning in &validation.warnings {
                tracing::warn!("Config: {}", warning);
            }

            if validation.is_ok() {
                tracing::info!("Configuration valid - initializing services");
                let service = JobService::from_config(&config);
                (AppState::initialized(service), config.server)
            } else {
                let error_msg = validation
                    .errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                tracing::error!("Invalid configuration: {}", error_msg);
                (AppState::config_error(error_msg), config.server)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            let mut defaults = DashboardConfig::default();
            if let Err(override_err) = ConfigLoader::apply_env_overrides(&mut defaults) {
                tracing::warn!(error = %override_err, "Ignoring environment overrides");
            }
            (AppState::config_error(e.to_string()), defaults.server)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    jobdash_core::logging::init();

    tracing::info!("Starting Jobdash API server");

    let (app_state, server) = load_state();

    let bind_addr: SocketAddr = server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address: {}", server.bind_addr))?;

    let app = routes::app_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors_layer(server.cors_origin.as_deref())?),
    );

    tracing::info!("Listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
