//! Retry logic.
//!
//! # Responsibilities
//! - Execute one logical request with a bounded number of attempts
//! - Classify each response as success, terminal "not found", or retryable
//! - Wait a fixed delay between attempts
//!
//! # Design Decisions
//! - Connection errors, timeouts, non-2xx (except 404) and malformed JSON
//!   bodies all count against the same attempt budget
//! - 404 is terminal and never consumes a retry
//! - Requests that cannot even be built are never retried
//! - Never panics or returns an error; every ending is a `RequestOutcome`

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Map, Value};

/// JSON object returned by the control plane.
pub type JsonObject = Map<String, Value>;

/// How a logical request ended.
#[derive(Debug)]
pub enum RequestOutcome {
    /// 2xx with a non-empty JSON object body.
    Json(JsonObject),
    /// 2xx where no body was expected.
    Completed,
    /// 404: the server has nothing for us. Terminal, not an error.
    NotFound,
    /// Every attempt failed.
    Exhausted { attempts: u32 },
    /// The request could not be constructed.
    Fatal(reqwest::Error),
}

impl RequestOutcome {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RequestOutcome::Json(_) => "json",
            RequestOutcome::Completed => "completed",
            RequestOutcome::NotFound => "not_found",
            RequestOutcome::Exhausted { .. } => "exhausted",
            RequestOutcome::Fatal(_) => "fatal",
        }
    }
}

/// Why a single attempt did not succeed.
#[derive(Debug)]
enum AttemptFailure {
    Transport(reqwest::Error),
    Status(StatusCode),
    MalformedBody(String),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::Transport(e) => write!(f, "transport error: {}", e),
            AttemptFailure::Status(s) => write!(f, "unexpected status {}", s),
            AttemptFailure::MalformedBody(reason) => write!(f, "malformed body: {}", reason),
        }
    }
}

/// Executes requests with bounded retries and a fixed delay.
#[derive(Debug, Clone)]
pub struct ResilientHttpClient {
    retry_delay: Duration,
}

impl ResilientHttpClient {
    pub fn new(retry_delay: Duration) -> Self {
        Self { retry_delay }
    }

    /// Run `request` until it succeeds, hits a terminal outcome, or
    /// `max_retries` attempts have failed.
    ///
    /// `request` is called once per attempt and must produce a fresh request.
    pub async fn execute<F, Fut>(
        &self,
        mut request: F,
        expect_json: bool,
        max_retries: u32,
    ) -> RequestOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = reqwest::Result<reqwest::Response>>,
    {
        let mut failures = 0;

        while failures < max_retries {
            let attempt = failures + 1;

            let failure = match request().await {
                Err(e) if e.is_builder() => {
                    tracing::error!(error = %e, "Request could not be built");
                    record_attempt("fatal");
                    return RequestOutcome::Fatal(e);
                }
                Err(e) => AttemptFailure::Transport(e),
                Ok(response) => match response.status() {
                    StatusCode::NOT_FOUND => {
                        record_attempt("not_found");
                        return RequestOutcome::NotFound;
                    }
                    status if status.is_success() => {
                        if !expect_json {
                            record_attempt("success");
                            return RequestOutcome::Completed;
                        }
                        match read_json_object(response).await {
                            Ok(object) => {
                                record_attempt("success");
                                return RequestOutcome::Json(object);
                            }
                            Err(reason) => AttemptFailure::MalformedBody(reason),
                        }
                    }
                    status => AttemptFailure::Status(status),
                },
            };

            failures += 1;
            record_attempt("retryable");
            tracing::warn!(
                attempt,
                max_attempts = max_retries,
                reason = %failure,
                "Request attempt failed"
            );

            if failures < max_retries {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        RequestOutcome::Exhausted { attempts: failures }
    }
}

async fn read_json_object(response: reqwest::Response) -> Result<JsonObject, String> {
    let body = response.bytes().await.map_err(|e| e.to_string())?;
    match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(object)) if !object.is_empty() => Ok(object),
        Ok(Value::Object(_)) => Err("empty JSON object".to_string()),
        Ok(_) => Err("JSON body is not an object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn record_attempt(result: &'static str) {
    metrics::counter!("gate_http_attempts_total", "result" => result).increment(1);
}
