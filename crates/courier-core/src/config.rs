use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::events::MessageType;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub worker: WorkerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_env("APP")
    }

    /// Load configuration from environment with custom prefix
    pub fn load_from_env(prefix: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(
                Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("worker.text", "")?
            .set_default("worker.image", "")?
            .set_default("worker.video", "")?
            .set_default("worker.audio", "")?
            .set_default("worker.file", "")?
            .set_default("worker.location", "")?
            .set_default("worker.sticker", "")?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load configuration from file with environment overrides
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("APP").separator("__"));

        let config = builder.build()?;
        config.try_deserialize()
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn new() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }

    pub fn with_host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Worker endpoint configuration: one URL per message subtype. An empty
/// string means that subtype has no destination and its messages are
/// acknowledged without being forwarded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerConfig {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub video: String,
    #[serde(default)]
    pub audio: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub sticker: String,
}

impl WorkerConfig {
    /// The configured URL string for a message subtype.
    pub fn url_for(&self, message_type: MessageType) -> &str {
        match message_type {
            MessageType::Text => &self.text,
            MessageType::Image => &self.image,
            MessageType::Video => &self.video,
            MessageType::Audio => &self.audio,
            MessageType::File => &self.file,
            MessageType::Location => &self.location,
            MessageType::Sticker => &self.sticker,
        }
    }

    pub fn with_text(mut self, url: String) -> Self {
        self.text = url;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_creation() {
        let config = ServerConfig::new()
            .with_host("127.0.0.1".to_string())
            .with_port(3000);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_worker_config_defaults_to_unrouted() {
        let config = WorkerConfig::default();

        for message_type in MessageType::ALL {
            assert_eq!(config.url_for(message_type), "");
        }
    }

    #[test]
    fn test_worker_config_url_lookup() {
        let config = WorkerConfig::default().with_text("http://worker/text".to_string());

        assert_eq!(config.url_for(MessageType::Text), "http://worker/text");
        assert_eq!(config.url_for(MessageType::Image), "");
    }

    #[test]
    fn test_load_from_env_defaults() {
        let config = AppConfig::load_from_env("COURIER_TEST_DEFAULTS").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.worker.text, "");
    }
}
