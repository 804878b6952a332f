//! Webhook receiving and forwarding for Courier
//!
//! This crate carries the decision logic of the service:
//! - Routing: which message subtypes have a worker destination
//! - Forwarding: one outbound POST per forwardable event, outcome normalized
//! - Dispatch: batch validation, concurrent fan-out, reply aggregation
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_core::config::WorkerConfig;
//! use courier_webhook::{create_webhook_router, Dispatcher, Forwarder, RoutingTable, WebhookState};
//! use std::sync::Arc;
//!
//! let worker = WorkerConfig::default().with_text("http://worker/text".into());
//! let routes = RoutingTable::from_config(&worker)?;
//! let dispatcher = Dispatcher::new(Forwarder::new(routes));
//! let router = create_webhook_router(Arc::new(WebhookState::new(dispatcher)));
//! ```

// Module order matters due to dependencies
pub mod routing;
pub mod forward;
pub mod dispatch;
pub mod inbound;

pub use routing::*;
pub use forward::*;
pub use dispatch::*;
pub use inbound::*;

use thiserror::Error;

/// Webhook errors
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Invalid worker URL for {0}: {1}")]
    InvalidRoute(String, String),
}

pub type Result<T> = std::result::Result<T, WebhookError>;
