//! Question validation

use thiserror::Error;

/// Errors surfaced to callers of the assistant
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AskError {
    /// Question missing, empty, or whitespace only
    #[error("Question cannot be empty")]
    EmptyQuestion,
}

/// A submitted question that passed validation.
///
/// Holds the text exactly as submitted; trimming is only used for the
/// emptiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question<'a>(&'a str);

impl<'a> Question<'a> {
    pub fn parse(raw: Option<&'a str>) -> Result<Self, AskError> {
        match raw {
            Some(text) if !text.trim().is_empty() => Ok(Self(text)),
            _ => Err(AskError::EmptyQuestion),
        }
    }

    pub const fn as_str(&self) -> &'a str {
        self.0
    }
}
