//! Message routing
//!
//! Maps each message subtype to its worker destination. The table is built
//! once at startup from configuration and is read-only afterwards, so it can
//! be shared across concurrent batches without locking.

use courier_core::config::WorkerConfig;
use courier_core::events::MessageType;
use reqwest::Url;
use std::collections::HashMap;
use tracing::info;

use crate::{Result, WebhookError};

/// Total mapping from message subtype to worker destination. Every subtype
/// has an entry; `None` means the subtype is acknowledged and dropped. A
/// blank configured URL and an absent one are the same thing.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    routes: HashMap<MessageType, Option<Url>>,
}

impl RoutingTable {
    /// Build the table from worker configuration. Fails on a non-blank URL
    /// that does not parse.
    pub fn from_config(config: &WorkerConfig) -> Result<Self> {
        let mut routes = HashMap::with_capacity(MessageType::ALL.len());

        for message_type in MessageType::ALL {
            let raw = config.url_for(message_type).trim();
            let destination = if raw.is_empty() {
                None
            } else {
                let url = Url::parse(raw).map_err(|e| {
                    WebhookError::InvalidRoute(message_type.as_str().to_string(), e.to_string())
                })?;
                Some(url)
            };
            routes.insert(message_type, destination);
        }

        let routed = routes.values().filter(|r| r.is_some()).count();
        info!(routed = routed, total = routes.len(), "Built message routing table");

        Ok(Self { routes })
    }

    /// Destination for a subtype, or `None` when it is unrouted.
    pub fn route(&self, message_type: MessageType) -> Option<&Url> {
        self.routes
            .get(&message_type)
            .and_then(|destination| destination.as_ref())
    }

    /// Number of subtypes with a configured destination.
    pub fn routed_count(&self) -> usize {
        self.routes.values().filter(|r| r.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_total() {
        let table = RoutingTable::from_config(&WorkerConfig::default()).unwrap();

        for message_type in MessageType::ALL {
            assert!(table.route(message_type).is_none());
        }
        assert_eq!(table.routed_count(), 0);
    }

    #[test]
    fn test_configured_route_resolves() {
        let config = WorkerConfig::default().with_text("http://worker/text".to_string());
        let table = RoutingTable::from_config(&config).unwrap();

        assert_eq!(
            table.route(MessageType::Text).unwrap().as_str(),
            "http://worker/text"
        );
        assert!(table.route(MessageType::Image).is_none());
        assert_eq!(table.routed_count(), 1);
    }

    #[test]
    fn test_blank_url_means_no_route() {
        let mut config = WorkerConfig::default();
        config.image = "   ".to_string();
        let table = RoutingTable::from_config(&config).unwrap();

        assert!(table.route(MessageType::Image).is_none());
    }

    #[test]
    fn test_invalid_url_rejected_at_build() {
        let mut config = WorkerConfig::default();
        config.video = "not a url".to_string();

        let result = RoutingTable::from_config(&config);
        assert!(matches!(result, Err(WebhookError::InvalidRoute(_, _))));
    }
}
