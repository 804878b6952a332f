//! Event forwarding
//!
//! Sends one outbound POST per forwardable event and normalizes the result.
//! Every event gets exactly one delivery attempt; retries, if any, are a
//! caller concern.

use chrono::Utc;
use courier_core::events::InboundEvent;
use reqwest::Client;
use tracing::{debug, warn};

use crate::routing::RoutingTable;

/// Result of attempting to forward one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Event is not a message, or its subtype has no worker destination
    Skipped,
    /// The worker answered; status and body are carried verbatim
    Forwarded { status: u16, body: String },
    /// No response was obtained (connection error, timeout, unreadable body)
    Failed { reason: String },
}

impl ForwardOutcome {
    /// True for `Forwarded` with a 2xx status.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Forwarded { status, .. } if (200..300).contains(status))
    }
}

/// Forwards message payloads to their configured worker endpoint
pub struct Forwarder {
    client: Client,
    routes: RoutingTable,
}

impl Forwarder {
    pub fn new(routes: RoutingTable) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, routes }
    }

    /// Forward a single event. Holds no memory of prior events; the same
    /// event forwarded twice produces two independent outbound calls.
    pub async fn forward(&self, event: &InboundEvent) -> ForwardOutcome {
        let message = match event.message_payload() {
            Some(message) => message,
            None => {
                debug!(kind = event.kind.as_str(), "Event is not forwardable");
                return ForwardOutcome::Skipped;
            }
        };

        let url = match self.routes.route(message.message_type) {
            Some(url) => url,
            None => {
                debug!(
                    message_type = message.message_type.as_str(),
                    "No worker route for message subtype"
                );
                return ForwardOutcome::Skipped;
            }
        };

        let started_at = Utc::now();
        let result = self.client.post(url.clone()).json(message).send().await;
        let duration_ms = (Utc::now() - started_at).num_milliseconds();

        match result {
            Ok(response) => {
                let status = response.status();

                if !status.is_success() {
                    warn!(
                        url = %url,
                        status = %status,
                        duration_ms = duration_ms,
                        "Worker replied with non-success status"
                    );
                }

                match response.text().await {
                    Ok(body) => ForwardOutcome::Forwarded {
                        status: status.as_u16(),
                        body,
                    },
                    Err(e) => ForwardOutcome::Failed {
                        reason: e.to_string(),
                    },
                }
            }
            Err(e) => {
                warn!(
                    url = %url,
                    error = %e,
                    duration_ms = duration_ms,
                    "Forwarding call failed"
                );

                ForwardOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::config::WorkerConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn text_event(text: &str) -> InboundEvent {
        serde_json::from_value(json!({
            "type": "message",
            "replyToken": "rt-1",
            "message": { "id": "m-1", "type": "text", "text": text }
        }))
        .unwrap()
    }

    fn follow_event() -> InboundEvent {
        serde_json::from_value(json!({ "type": "follow" })).unwrap()
    }

    fn forwarder_for(server: &MockServer) -> Forwarder {
        let config =
            WorkerConfig::default().with_text(format!("{}/worker/text", server.uri()));
        Forwarder::new(RoutingTable::from_config(&config).unwrap())
    }

    #[tokio::test]
    async fn test_non_message_event_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let forwarder = forwarder_for(&server);
        let outcome = forwarder.forward(&follow_event()).await;

        assert_eq!(outcome, ForwardOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_message_event_without_payload_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let forwarder = forwarder_for(&server);
        let event: InboundEvent =
            serde_json::from_value(json!({ "type": "message" })).unwrap();

        assert_eq!(forwarder.forward(&event).await, ForwardOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_unrouted_subtype_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let forwarder = forwarder_for(&server);
        let event: InboundEvent = serde_json::from_value(json!({
            "type": "message",
            "message": { "id": "m-2", "type": "sticker", "packageId": "1", "stickerId": "2" }
        }))
        .unwrap();

        assert_eq!(forwarder.forward(&event).await, ForwardOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_forwarded_posts_message_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/worker/text"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "id": "m-1", "type": "text", "text": "hi" })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let forwarder = forwarder_for(&server);
        let outcome = forwarder.forward(&text_event("hi")).await;

        assert_eq!(
            outcome,
            ForwardOutcome::Forwarded {
                status: 200,
                body: "{}".to_string()
            }
        );
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_upstream_error_is_carried_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/worker/text"))
            .respond_with(ResponseTemplate::new(503).set_body_string("worker overloaded"))
            .mount(&server)
            .await;

        let forwarder = forwarder_for(&server);
        let outcome = forwarder.forward(&text_event("hi")).await;

        assert_eq!(
            outcome,
            ForwardOutcome::Forwarded {
                status: 503,
                body: "worker overloaded".to_string()
            }
        );
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_transport_failure_is_failed() {
        let server = MockServer::start().await;
        let config =
            WorkerConfig::default().with_text(format!("{}/worker/text", server.uri()));
        let forwarder = Forwarder::new(RoutingTable::from_config(&config).unwrap());
        // Shut the stub down so the connection is refused
        drop(server);

        let outcome = forwarder.forward(&text_event("hi")).await;
        assert!(matches!(outcome, ForwardOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_forwarding_is_stateless() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/worker/text"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(2)
            .mount(&server)
            .await;

        let forwarder = forwarder_for(&server);
        let event = text_event("same content");

        assert!(forwarder.forward(&event).await.is_success());
        assert!(forwarder.forward(&event).await.is_success());
    }
}
