//! LlmClient trait and a scripted mock for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{EdugenError, Result};
use crate::llm::types::{CompletionRequest, CompletionResponse, StopReason, Usage};

/// Stateless LLM client - each call is independent (fresh context)
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request (resolves when the full response is available)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Default model this client is configured with
    fn model(&self) -> &str;

    /// Whether the client is configured well enough to make calls
    fn is_ready(&self) -> bool;
}

/// A scripted reply for the mock client
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    TransportError(String),
}

/// Mock LLM client that replays scripted responses in FIFO order.
///
/// Used by unit and integration tests; never makes network calls.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    /// Create a mock with no scripted replies
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text reply
    pub fn push_text(&self, content: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Text(content.into()));
    }

    /// Queue a transport failure
    pub fn push_transport_error(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::TransportError(message.into()));
    }

    /// Convenience: a mock that always has this one reply queued first
    pub fn with_text(content: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.push_text(content);
        mock
    }

    /// Requests observed so far, in call order
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls made against this mock
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| EdugenError::Transport("mock has no scripted reply".to_string()))?;

        match reply {
            MockReply::Text(content) => Ok(CompletionResponse {
                content,
                stop_reason: StopReason::EndTurn,
                usage: Usage::new(10, 10),
            }),
            MockReply::TransportError(message) => Err(EdugenError::Transport(message)),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }
}
