//! Batch dispatch
//!
//! Validates an inbound webhook payload, fans the events out to the
//! forwarder, and folds the outcomes into the single reply sent back to the
//! platform.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use courier_core::events::WebhookBatch;
use futures::future;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::forward::{ForwardOutcome, Forwarder};

/// Rejection of a malformed inbound payload. Surfaced as HTTP 400; nothing
/// is forwarded for a rejected batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request body is required")]
    MissingBody,
    #[error("events is required")]
    MissingEvents,
    #[error("events must not be empty")]
    EmptyEvents,
    #[error("invalid event payload: {0}")]
    MalformedEvents(String),
}

/// The single HTTP reply for one webhook call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReply {
    pub status: StatusCode,
    pub body: String,
}

impl IntoResponse for BatchReply {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

/// Dispatches webhook batches to the forwarder and aggregates the outcomes
pub struct Dispatcher {
    forwarder: Forwarder,
}

impl Dispatcher {
    pub fn new(forwarder: Forwarder) -> Self {
        Self { forwarder }
    }

    /// Check the payload shape before any dispatch work. The body must be a
    /// JSON object whose `events` field is a non-empty array of known
    /// events.
    pub fn validate(body: &[u8]) -> Result<WebhookBatch, ValidationError> {
        if body.is_empty() {
            return Err(ValidationError::MissingBody);
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ValidationError::MalformedEvents(e.to_string()))?;

        match value.get("events") {
            Some(Value::Array(events)) if events.is_empty() => {
                return Err(ValidationError::EmptyEvents)
            }
            Some(Value::Array(_)) => {}
            Some(_) | None => return Err(ValidationError::MissingEvents),
        }

        serde_json::from_value(value).map_err(|e| ValidationError::MalformedEvents(e.to_string()))
    }

    /// Forward every forwardable event in the batch and fold the outcomes
    /// into one reply. All forwards are issued before any is awaited, and
    /// outcomes land in arrival order regardless of completion order.
    pub async fn handle(&self, batch: WebhookBatch) -> BatchReply {
        let pending: Vec<_> = batch
            .events
            .iter()
            .map(|event| self.forwarder.forward(event))
            .collect();
        let outcomes = future::join_all(pending).await;

        let forwarded = outcomes
            .iter()
            .filter(|o| matches!(o, ForwardOutcome::Forwarded { .. }))
            .count();
        info!(
            events = outcomes.len(),
            forwarded = forwarded,
            skipped = outcomes.len() - forwarded,
            "Dispatched webhook batch"
        );

        aggregate(&outcomes)
    }
}

/// Fold per-event outcomes into the reply. The first failing outcome in
/// arrival order wins; a fully successful batch mirrors the first worker
/// reply, and a batch with nothing forwarded is acknowledged with a bare
/// 200.
fn aggregate(outcomes: &[ForwardOutcome]) -> BatchReply {
    for outcome in outcomes {
        match outcome {
            ForwardOutcome::Forwarded { status, body } if !outcome.is_success() => {
                return BatchReply {
                    status: StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                    body: body.clone(),
                };
            }
            ForwardOutcome::Failed { reason } => {
                return BatchReply {
                    status: StatusCode::BAD_GATEWAY,
                    body: reason.clone(),
                };
            }
            _ => {}
        }
    }

    for outcome in outcomes {
        if let ForwardOutcome::Forwarded { status, body } = outcome {
            return BatchReply {
                status: StatusCode::from_u16(*status).unwrap_or(StatusCode::OK),
                body: body.clone(),
            };
        }
    }

    BatchReply {
        status: StatusCode::OK,
        body: String::new(),
    }
}
