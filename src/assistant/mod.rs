//! Assistant module
//!
//! Question answering core:
//! - `Responder` capability with keyword and external-service variants
//! - `AssistantService` validating questions and recording answers

mod external;
mod question;
mod responder;
mod service;

pub use external::ExternalResponder;
pub use responder::{KeywordResponder, Responder};
pub use service::AssistantService;

#[cfg(test)]
pub use responder::{GENERIC_PROMPT, RECOMMENDATION};
