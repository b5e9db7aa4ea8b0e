//! Request handling for submitted questions
//!
//! Validates input, asks the responder and records the exchange in the
//! query log when one is attached.

use std::sync::Arc;

use super::question::{AskError, Question};
use super::responder::Responder;
use crate::logger;
use crate::query_log::QueryLog;

pub struct AssistantService {
    responder: Arc<dyn Responder>,
    query_log: Option<Arc<dyn QueryLog>>,
}

impl AssistantService {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self {
            responder,
            query_log: None,
        }
    }

    #[must_use]
    pub fn with_query_log(mut self, query_log: Arc<dyn QueryLog>) -> Self {
        self.query_log = Some(query_log);
        self
    }

    pub fn responder_name(&self) -> &'static str {
        self.responder.name()
    }

    pub const fn has_query_log(&self) -> bool {
        self.query_log.is_some()
    }

    /// Answer a question.
    ///
    /// A failed query log append is logged and does not affect the answer.
    pub async fn ask(&self, question: Option<&str>) -> Result<String, AskError> {
        let question = Question::parse(question)?;
        let answer = self.responder.respond(question.as_str()).await;

        if let Some(query_log) = &self.query_log {
            match query_log.append(question.as_str(), &answer).await {
                Ok(entry) => logger::log_debug(&format!("[QueryLog] Stored entry #{}", entry.id)),
                Err(e) => logger::log_error(&format!("Failed to persist query log entry: {e}")),
            }
        }

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::responder::{keyword_answer, KeywordResponder, GENERIC_PROMPT, RECOMMENDATION};
    use crate::query_log::{MemoryQueryLog, QueryLogEntry, QueryLogError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Keyword responder that counts invocations
    #[derive(Default)]
    struct CountingResponder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Responder for CountingResponder {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn respond(&self, question: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            keyword_answer(question).to_string()
        }
    }

    struct BrokenQueryLog;

    #[async_trait]
    impl QueryLog for BrokenQueryLog {
        async fn append(&self, _: &str, _: &str) -> Result<QueryLogEntry, QueryLogError> {
            Err(QueryLogError::Io(std::io::Error::other("disk full")))
        }
    }

    #[tokio::test]
    async fn test_answers_valid_question() {
        let service = AssistantService::new(Arc::new(KeywordResponder));
        for q in ["Symptom check", "I have a headache", "  spaced out  ", "x"] {
            let answer = service.ask(Some(q)).await.unwrap();
            assert_eq!(answer, keyword_answer(q));
        }
    }

    #[tokio::test]
    async fn test_empty_question_skips_responder() {
        let responder = Arc::new(CountingResponder::default());
        let log = Arc::new(MemoryQueryLog::with_capacity(64));
        let service = AssistantService::new(responder.clone()).with_query_log(log.clone());

        for q in [None, Some(""), Some("   "), Some("\n\t")] {
            assert_eq!(service.ask(q).await, Err(AskError::EmptyQuestion));
        }
        assert_eq!(responder.calls.load(Ordering::SeqCst), 0);
        assert!(log.entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_each_answer_logged_once_with_increasing_ids() {
        let log = Arc::new(MemoryQueryLog::with_capacity(64));
        let service = AssistantService::new(Arc::new(KeywordResponder)).with_query_log(log.clone());

        let questions = ["What symptoms matter?", "How do I sleep better?", "SYMPTOM"];
        for q in questions {
            service.ask(Some(q)).await.unwrap();
        }
        service.ask(Some("")).await.unwrap_err();

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), questions.len());
        for (entry, q) in entries.iter().zip(questions) {
            assert_eq!(entry.question, q);
            assert_eq!(entry.response, keyword_answer(q));
        }
        assert!(entries.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(entries[1].response, GENERIC_PROMPT);
    }

    #[tokio::test]
    async fn test_log_failure_does_not_affect_answer() {
        let service =
            AssistantService::new(Arc::new(KeywordResponder)).with_query_log(Arc::new(BrokenQueryLog));
        assert_eq!(service.ask(Some("symptoms?")).await.unwrap(), RECOMMENDATION);
        assert!(service.has_query_log());
        assert_eq!(service.responder_name(), "keyword");
    }
}
