//! Responder capability and the built-in keyword rule

use async_trait::async_trait;

/// Answer returned when the question mentions symptoms
pub const RECOMMENDATION: &str = "Based on your symptoms, I recommend consulting a doctor.";

/// Answer returned for everything else
pub const GENERIC_PROMPT: &str = "Can you please provide more details about your health concern?";

const SYMPTOM_KEYWORD: &str = "symptom";

/// Maps a question to an answer.
///
/// Implementations must be total: every question gets an answer, failures
/// are handled internally.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    async fn respond(&self, question: &str) -> String;
}

/// Keyword rule: a case-insensitive search for "symptom"
pub fn keyword_answer(question: &str) -> &'static str {
    if question.to_lowercase().contains(SYMPTOM_KEYWORD) {
        RECOMMENDATION
    } else {
        GENERIC_PROMPT
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordResponder;

#[async_trait]
impl Responder for KeywordResponder {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn respond(&self, question: &str) -> String {
        keyword_answer(question).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symptom_keyword_case_insensitive() {
        assert_eq!(keyword_answer("Symptom check"), RECOMMENDATION);
        assert_eq!(keyword_answer("SYMPTOM check"), RECOMMENDATION);
        assert_eq!(keyword_answer("what are the symptoms of flu?"), RECOMMENDATION);
        assert_eq!(keyword_answer("Symptom check"), keyword_answer("SYMPTOM check"));
    }

    #[test]
    fn test_generic_prompt_without_keyword() {
        assert_eq!(keyword_answer("I have a headache"), GENERIC_PROMPT);
        assert_eq!(keyword_answer("symp tom"), GENERIC_PROMPT);
    }

    #[tokio::test]
    async fn test_keyword_responder_is_deterministic() {
        let responder = KeywordResponder;
        let first = responder.respond("any symptoms to watch?").await;
        let second = responder.respond("any symptoms to watch?").await;
        assert_eq!(first, second);
        assert_eq!(first, RECOMMENDATION);
        assert_eq!(responder.name(), "keyword");
    }
}
