// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub assistant: AssistantConfig,
    pub query_log: QueryLogConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level: error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
    /// Seconds to wait for in-flight connections on shutdown
    pub shutdown_timeout: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
    pub health_path: String,
}

/// Which answering strategy backs `/api/ask`
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponderKind {
    /// Built-in keyword rule
    Keyword,
    /// Remote answering service, keyword rule as fallback
    External,
}

/// Assistant configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    pub responder: ResponderKind,
    /// Endpoint of the external answering service
    #[serde(default)]
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

/// Query log storage backend
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryLogBackend {
    Memory,
    File,
}

/// Query log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct QueryLogConfig {
    pub enabled: bool,
    pub backend: QueryLogBackend,
    /// JSON Lines file used by the file backend
    pub path: String,
    /// Entries the memory backend retains before evicting the oldest
    pub max_entries: usize,
}
