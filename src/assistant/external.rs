//! External answering service
//!
//! Forwards the question to a remote HTTP endpoint. Any failure falls back to
//! the keyword rule so the responder stays total.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::responder::{keyword_answer, Responder};
use crate::logger;

#[derive(Debug, Serialize)]
struct RemoteRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct RemoteResponse {
    response: Option<String>,
}

#[derive(Debug, Error)]
enum RemoteError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("response field missing")]
    MissingAnswer,
}

pub struct ExternalResponder {
    client: reqwest::Client,
    endpoint: String,
}

impl ExternalResponder {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn ask_remote(&self, question: &str) -> Result<String, RemoteError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&RemoteRequest { question })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let body: RemoteResponse = resp.json().await?;
        body.response.ok_or(RemoteError::MissingAnswer)
    }
}

#[async_trait]
impl Responder for ExternalResponder {
    fn name(&self) -> &'static str {
        "external"
    }

    async fn respond(&self, question: &str) -> String {
        match self.ask_remote(question).await {
            Ok(answer) => answer,
            Err(e) => {
                logger::log_warning(&format!(
                    "External responder {} failed ({e}), using keyword rule",
                    self.endpoint
                ));
                keyword_answer(question).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::responder::{GENERIC_PROMPT, RECOMMENDATION};
    use http_body_util::{BodyExt, Full};
    use hyper::body::Bytes;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper::{Response, StatusCode};
    use hyper_util::rt::TokioIo;
    use std::convert::Infallible;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    /// Serve every request with a fixed status and body
    async fn spawn_stub(status: StatusCode, body: &'static str) -> SocketAddr {
        spawn_delayed_stub(status, body, Duration::ZERO).await
    }

    /// Like `spawn_stub`, answering only after `delay`
    async fn spawn_delayed_stub(status: StatusCode, body: &'static str, delay: Duration) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let svc = service_fn(move |req: hyper::Request<hyper::body::Incoming>| async move {
                        // Drain the request so the connection stays well-formed
                        let _ = req.into_body().collect().await;
                        tokio::time::sleep(delay).await;
                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .header("Content-Type", "application/json")
                                .body(Full::new(Bytes::from(body)))
                                .unwrap(),
                        )
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), svc)
                        .await;
                });
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_uses_remote_answer() {
        let addr = spawn_stub(StatusCode::OK, r#"{"response":"Drink water and rest."}"#).await;
        let responder =
            ExternalResponder::new(format!("http://{addr}/answer"), Duration::from_secs(5)).unwrap();
        assert_eq!(responder.respond("I feel tired").await, "Drink water and rest.");
    }

    #[tokio::test]
    async fn test_falls_back_on_error_status() {
        let addr = spawn_stub(StatusCode::SERVICE_UNAVAILABLE, r#"{"error":"busy"}"#).await;
        let responder =
            ExternalResponder::new(format!("http://{addr}/answer"), Duration::from_secs(5)).unwrap();
        assert_eq!(responder.respond("symptom list").await, RECOMMENDATION);
    }

    #[tokio::test]
    async fn test_falls_back_on_missing_field() {
        let addr = spawn_stub(StatusCode::OK, r#"{"answer":"wrong field"}"#).await;
        let responder =
            ExternalResponder::new(format!("http://{addr}/answer"), Duration::from_secs(5)).unwrap();
        assert_eq!(responder.respond("hello").await, GENERIC_PROMPT);
    }

    #[tokio::test]
    async fn test_falls_back_when_unreachable() {
        // Bind then drop to get a port nothing listens on
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let responder =
            ExternalResponder::new(format!("http://{addr}/answer"), Duration::from_secs(2)).unwrap();
        assert_eq!(responder.respond("Any SYMPTOM advice?").await, RECOMMENDATION);
        assert_eq!(responder.name(), "external");
    }

    #[tokio::test]
    async fn test_falls_back_when_remote_too_slow() {
        let addr = spawn_delayed_stub(
            StatusCode::OK,
            r#"{"response":"too late"}"#,
            Duration::from_secs(2),
        )
        .await;
        let responder =
            ExternalResponder::new(format!("http://{addr}/answer"), Duration::from_millis(100))
                .unwrap();

        let started = std::time::Instant::now();
        assert_eq!(responder.respond("symptom timing").await, RECOMMENDATION);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
