use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::time::Instant;
use trivia_core::model::Question;

use super::{BatchRequest, TriviaProvider};
use crate::error::{ProviderError, SourceError};

/// Canned outcome replayed by `ScriptedProvider`.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Questions(Vec<Question>),
    /// Non-zero provider `response_code`.
    Code(i64),
    /// Non-success HTTP status.
    Status(u16),
}

impl ScriptedResponse {
    fn into_result(self) -> Result<Vec<Question>, SourceError> {
        match self {
            Self::Questions(questions) => Ok(questions),
            Self::Code(code) => Err(ProviderError::from_code(code).into()),
            Self::Status(429) => Err(SourceError::RateLimited),
            Self::Status(raw) => Err(SourceError::HttpStatus(
                StatusCode::from_u16(raw).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            )),
        }
    }
}

/// Record of one call made against a `ScriptedProvider`.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: BatchRequest,
    pub at: Instant,
}

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<ScriptedResponse>,
    last: Option<ScriptedResponse>,
    calls: Vec<RecordedCall>,
}

/// In-memory provider that replays queued responses and records every call.
///
/// Once the queue is drained the final response repeats. With nothing queued at
/// all, calls return an empty batch.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<Script>,
    latency: Duration,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new(responses: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        Self {
            script: Mutex::new(Script {
                queue: responses.into_iter().collect(),
                ..Script::default()
            }),
            latency: Duration::ZERO,
        }
    }

    /// Delay every response by `latency` (virtual time under a paused runtime).
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn push(&self, response: ScriptedResponse) {
        self.lock().queue.push_back(response);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn next_response(&self, request: &BatchRequest) -> ScriptedResponse {
        let mut script = self.lock();
        script.calls.push(RecordedCall {
            request: request.clone(),
            at: Instant::now(),
        });
        if let Some(next) = script.queue.pop_front() {
            script.last = Some(next.clone());
            return next;
        }
        script
            .last
            .clone()
            .unwrap_or_else(|| ScriptedResponse::Questions(Vec::new()))
    }
}

#[async_trait]
impl TriviaProvider for ScriptedProvider {
    async fn fetch_questions(&self, request: &BatchRequest) -> Result<Vec<Question>, SourceError> {
        let response = self.next_response(request);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        response.into_result()
    }
}
