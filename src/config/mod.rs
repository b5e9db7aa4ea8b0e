// Configuration module entry point
// Loads layered configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, QueryLogBackend, ResponderKind};

/// Environment variable prefix, e.g. `ASSISTANT__SERVER__PORT=9000`
const ENV_PREFIX: &str = "ASSISTANT";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 5)?
            .set_default("http.server_name", "health-assistant/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 65_536)? // 64KB
            .set_default("http.health_path", "/healthz")?
            .set_default("assistant.responder", "keyword")?
            .set_default("assistant.timeout_secs", 10)?
            .set_default("query_log.enabled", true)?
            .set_default("query_log.backend", "memory")?
            .set_default("query_log.path", "data/query_log.jsonl")?
            .set_default("query_log.max_entries", 10_000)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate().map_err(config::ConfigError::Message)?;
        Ok(cfg)
    }

    /// Reject combinations the server cannot start with
    pub fn validate(&self) -> Result<(), String> {
        let has_endpoint = matches!(
            self.assistant.endpoint.as_deref(),
            Some(e) if !e.trim().is_empty()
        );
        if self.assistant.responder == ResponderKind::External && !has_endpoint {
            return Err("assistant.endpoint is required when assistant.responder = \"external\"".to_string());
        }
        if self.http.max_body_size == 0 {
            return Err("http.max_body_size must be greater than zero".to_string());
        }
        if self.query_log.backend == QueryLogBackend::Memory && self.query_log.max_entries == 0 {
            return Err("query_log.max_entries must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
