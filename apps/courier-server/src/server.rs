//! HTTP Server implementation

use anyhow::{Context, Result};
use axum::{http::StatusCode, response::Json, routing::get, Router};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

use courier_webhook::create_webhook_router;

use crate::app::AppState;

pub struct Server {
    state: AppState,
}

impl Server {
    pub fn new(state: AppState) -> Result<Self> {
        Ok(Self { state })
    }

    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = self
            .state
            .config
            .server
            .address()
            .parse()
            .context("Invalid server address")?;

        // Build HTTP router
        let app = self.build_http_router();

        info!("HTTP server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("Failed to bind HTTP server")?;

        axum::serve(listener, app.into_make_service())
            .await
            .context("HTTP server error")?;

        Ok(())
    }

    fn build_http_router(&self) -> Router {
        // Combine service routes with the webhook router
        Router::new()
            .route("/", get(root))
            .route("/health", get(health_check))
            .merge(create_webhook_router(self.state.webhook.clone()))
            .layer(TraceLayer::new_for_http())
    }
}

// Route handlers

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": "Courier",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}
