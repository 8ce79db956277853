/// HTTP server setup and routing
use crate::{context::AppContext, error::ConnectorResult};
use axum::{
    http::{header, Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .with_state(ctx)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .fallback(not_found)
}

/// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "endpoint not found" })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> ConnectorResult<()> {
    let addr = format!("0.0.0.0:{}", ctx.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, identity = ctx.identity.identity(), "connector API listening");

    axum::serve(listener, build_router(ctx)).await?;

    Ok(())
}
