//! Inbound webhook handling
//!
//! The HTTP surface of the service: accepts the platform's webhook calls,
//! hands validated batches to the dispatcher, and writes the aggregated
//! reply back.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dispatch::Dispatcher;

/// Shared state for webhook routes
pub struct WebhookState {
    dispatcher: Dispatcher,
}

impl WebhookState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

/// Create Axum router for inbound webhooks
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/webhook", post(handle_webhook))
        .with_state(state)
}

/// Handle incoming webhook request
async fn handle_webhook(State(state): State<Arc<WebhookState>>, body: Bytes) -> Response {
    let receipt_id = format!("whr_{}", Uuid::new_v4().to_string().replace('-', ""));
    let received_at = Utc::now();

    let batch = match Dispatcher::validate(&body) {
        Ok(batch) => batch,
        Err(e) => {
            warn!(receipt_id = %receipt_id, error = %e, "Rejected webhook payload");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    info!(
        receipt_id = %receipt_id,
        events = batch.events.len(),
        "Received webhook batch"
    );

    let reply = state.dispatcher.handle(batch).await;

    info!(
        receipt_id = %receipt_id,
        status = %reply.status,
        duration_ms = (Utc::now() - received_at).num_milliseconds(),
        "Webhook batch answered"
    );

    reply.into_response()
}
