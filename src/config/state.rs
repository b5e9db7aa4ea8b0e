// Application state module
// Shared per-process state handed to every connection

use std::sync::Arc;
use std::time::Duration;

use super::types::{Config, QueryLogBackend, ResponderKind};
use crate::assistant::{AssistantService, ExternalResponder, KeywordResponder, Responder};
use crate::query_log::{FileQueryLog, MemoryQueryLog, QueryLog};

/// Application state
pub struct AppState {
    pub config: Config,
    pub assistant: AssistantService,
}

impl AppState {
    pub const fn new(config: Config, assistant: AssistantService) -> Self {
        Self { config, assistant }
    }

    /// Build the responder and query log described by the configuration
    pub async fn from_config(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let responder: Arc<dyn Responder> = match config.assistant.responder {
            ResponderKind::Keyword => Arc::new(KeywordResponder),
            ResponderKind::External => {
                let endpoint = config
                    .assistant
                    .endpoint
                    .clone()
                    .ok_or("assistant.endpoint is required for the external responder")?;
                Arc::new(ExternalResponder::new(
                    endpoint,
                    Duration::from_secs(config.assistant.timeout_secs),
                )?)
            }
        };

        let mut assistant = AssistantService::new(responder);
        if config.query_log.enabled {
            let query_log: Arc<dyn QueryLog> = match config.query_log.backend {
                QueryLogBackend::Memory => {
                    Arc::new(MemoryQueryLog::with_capacity(config.query_log.max_entries))
                }
                QueryLogBackend::File => Arc::new(FileQueryLog::open(&config.query_log.path).await?),
            };
            assistant = assistant.with_query_log(query_log);
        }

        Ok(Self::new(config, assistant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> Config {
        Config::load_from("does-not-exist/health-assistant").unwrap()
    }

    #[tokio::test]
    async fn test_defaults_build_keyword_with_memory_log() {
        let state = AppState::from_config(default_config()).await.unwrap();
        assert_eq!(state.assistant.responder_name(), "keyword");
        assert!(state.assistant.has_query_log());
    }

    #[tokio::test]
    async fn test_disabled_query_log() {
        let mut config = default_config();
        config.query_log.enabled = false;
        let state = AppState::from_config(config).await.unwrap();
        assert!(!state.assistant.has_query_log());
    }

    #[tokio::test]
    async fn test_external_and_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log/queries.jsonl");

        let mut config = default_config();
        config.assistant.responder = ResponderKind::External;
        config.assistant.endpoint = Some("http://127.0.0.1:9/answer".to_string());
        config.query_log.backend = QueryLogBackend::File;
        config.query_log.path = path.to_string_lossy().into_owned();

        let state = AppState::from_config(config).await.unwrap();
        assert_eq!(state.assistant.responder_name(), "external");
        assert!(path.exists());
    }
}
