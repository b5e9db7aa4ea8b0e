// Request/response envelopes for the ask endpoint

use serde::{Deserialize, Serialize};

/// `POST /api/ask` body
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Missing is treated the same as empty
    #[serde(default)]
    pub question: Option<String>,
}

/// Successful answer
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub response: String,
}
