//! Router assembly and serving.

use std::net::{IpAddr, SocketAddr};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use super::handlers::{delete_handler, health_handler, read_handler, upload_handler};
use super::types::{ApiSizeLimits, ApiState};
use crate::error::{Result, VanthuError};

/// Create the ingestion router with default size limits.
///
/// Public so the router can be embedded in a larger application; the
/// shipped server binary is one thin consumer of exactly this function.
pub fn create_router(state: ApiState) -> Router {
    create_router_with_limits(state, ApiSizeLimits::default())
}

/// Create the ingestion router with custom size limits.
pub fn create_router_with_limits(state: ApiState, limits: ApiSizeLimits) -> Router {
    // The upload clients are browser forms served from a different origin;
    // the deployment fronts this service with its own access control.
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/upload", post(upload_handler))
        .route("/delete", post(delete_handler))
        .route("/read", post(read_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(limits.max_request_body_bytes))
        .layer(RequestBodyLimitLayer::new(limits.max_request_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(host: &str, port: u16, state: ApiState) -> Result<()> {
    let ip: IpAddr = host
        .parse()
        .map_err(|e| VanthuError::validation(format!("invalid bind address '{host}': {e}")))?;
    let addr = SocketAddr::new(ip, port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "ingestion endpoint listening");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
