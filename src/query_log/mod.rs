//! Query log module
//!
//! Append-only record of answered questions. The assistant only sees the
//! `QueryLog` capability; storage backends live in submodules.

mod file;
mod memory;

pub use file::FileQueryLog;
pub use memory::MemoryQueryLog;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One answered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    /// Assigned by the sink, strictly increasing
    pub id: u64,
    pub question: String,
    pub response: String,
    /// Time the entry was persisted
    pub created_at: DateTime<Utc>,
}

impl QueryLogEntry {
    fn new(id: u64, question: &str, response: &str) -> Self {
        Self {
            id,
            question: question.to_string(),
            response: response.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryLogError {
    #[error("query log I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("query log serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("query log lock poisoned")]
    Poisoned,
}

/// Append-only sink for question/response pairs
#[async_trait]
pub trait QueryLog: Send + Sync {
    async fn append(&self, question: &str, response: &str) -> Result<QueryLogEntry, QueryLogError>;
}
