//! Scripted judgement provider for tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::JudgeError;
use super::provider::JudgementProvider;

/// Mock provider returning scripted responses in FIFO order.
///
/// Clones share the same script and call counter, so a clone can be handed to
/// the scorer while the test keeps the original for assertions.
#[derive(Clone, Default)]
pub struct MockJudgementProvider {
    responses: Arc<Mutex<VecDeque<Result<String, JudgeError>>>>,
    calls: Arc<AtomicUsize>,
}

impl MockJudgementProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor with a single scripted reply.
    pub fn with_response(response: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.push_ok(response);
        mock
    }

    pub fn push_ok(&self, response: impl Into<String>) {
        self.responses.lock().push_back(Ok(response.into()));
    }

    pub fn push_err(&self, error: JudgeError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Number of `complete` calls observed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JudgementProvider for MockJudgementProvider {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, JudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(JudgeError::Provider("mock script exhausted".to_string())))
    }
}
