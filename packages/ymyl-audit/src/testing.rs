//! Testing utilities including mock implementations.
//!
//! Useful for testing applications that use the audit library without
//! making real LLM calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use crate::agent::AuditAgent;
use crate::error::{AgentError, AgentResult};

/// Record of a call made to the mock auditor.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub task_name: String,
    pub payload: String,
}

/// One scripted reply.
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    ApiError(String),
    Timeout,
}

/// A mock audit agent for testing.
///
/// Replies are scripted in order; once the script is exhausted every call
/// receives the default response. Tracks calls and the concurrent-call
/// high-water mark so tests can assert on dispatch behavior. State is
/// shared across clones, so a clone kept outside an orchestrator still
/// observes the calls made inside it.
#[derive(Default, Clone)]
pub struct MockAuditor {
    scripted: Arc<Mutex<VecDeque<MockReply>>>,
    default_response: Arc<RwLock<String>>,
    call_delay: Arc<RwLock<Duration>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
    in_flight: Arc<AtomicUsize>,
    high_water: Arc<AtomicUsize>,
}

impl MockAuditor {
    /// Create a mock whose default reply is an empty findings array.
    pub fn new() -> Self {
        let mock = Self::default();
        *mock.default_response.write().unwrap() = "[]".to_string();
        mock
    }

    /// Queue a scripted reply.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .push_back(MockReply::Text(text.into()));
        self
    }

    /// Queue a scripted API failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .push_back(MockReply::ApiError(message.into()));
        self
    }

    /// Queue a scripted timeout failure.
    pub fn with_timeout_failure(self) -> Self {
        self.scripted.lock().unwrap().push_back(MockReply::Timeout);
        self
    }

    /// Set the reply used once the script is exhausted.
    pub fn with_default_response(self, text: impl Into<String>) -> Self {
        *self.default_response.write().unwrap() = text.into();
        self
    }

    /// Hold every call for the given duration, so concurrency assertions
    /// have something to observe.
    pub fn with_call_delay(self, delay: Duration) -> Self {
        *self.call_delay.write().unwrap() = delay;
        self
    }

    /// All calls made to this mock.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of calls that were ever in flight simultaneously.
    pub fn concurrent_high_water_mark(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuditAgent for MockAuditor {
    async fn review(
        &self,
        payload: &str,
        task_name: &str,
        _timeout: Duration,
    ) -> AgentResult<String> {
        self.calls.lock().unwrap().push(MockCall {
            task_name: task_name.to_string(),
            payload: payload.to_string(),
        });

        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(now_in_flight, Ordering::SeqCst);

        let delay = *self.call_delay.read().unwrap();
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }

        let reply = self.scripted.lock().unwrap().pop_front();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            None => Ok(self.default_response.read().unwrap().clone()),
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::ApiError(message)) => Err(AgentError::Api {
                code: "mock".to_string(),
                message,
            }),
            Some(MockReply::Timeout) => Err(AgentError::Timeout { seconds: 300 }),
        }
    }
}
