//! Application state and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use courier_core::config::AppConfig;
use courier_webhook::{Dispatcher, Forwarder, RoutingTable, WebhookState};

use crate::cli::Args;
use crate::server::Server;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: AppConfig,
    /// Webhook dispatch state
    pub webhook: Arc<WebhookState>,
}

impl AppState {
    /// Create a new application state with all dependencies
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing application components");

        let routes = RoutingTable::from_config(&config.worker)
            .context("Failed to build message routing table")?;
        info!(routed = routes.routed_count(), "Worker routes configured");

        let forwarder = Forwarder::new(routes);
        let webhook = Arc::new(WebhookState::new(Dispatcher::new(forwarder)));

        Ok(Self { config, webhook })
    }
}

/// Main application
pub struct App {
    state: AppState,
}

impl App {
    /// Build the application with all dependencies
    pub async fn build(args: Args) -> Result<Self> {
        // Validate arguments
        args.validate().context("Invalid command line arguments")?;

        // Load configuration: file when present, environment otherwise
        let mut config = if args.config.exists() {
            AppConfig::load_from_file(&args.config.to_string_lossy())
                .context("Failed to load configuration file")?
        } else {
            AppConfig::load().context("Failed to load configuration from environment")?
        };

        if let Some(port) = args.port {
            config.server.port = port;
        }

        // Initialize application state
        let state = AppState::new(config)?;

        Ok(Self { state })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        info!("Starting server");
        info!("Listening on {}", self.state.config.server.address());

        // Create and run server
        let server = Server::new(self.state)?;
        server.run().await?;

        Ok(())
    }
}
