//! Scripted in-memory transport for testing without a live service.

use crate::{ApiRequest, Transport};
use lanyard_core::{Error, Result};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What the mock should do for one `execute` call.
enum Scripted {
    Respond(Value),
    Fail(String),
    /// Never resolve; lets tests drive timeout and cancellation paths.
    Hang,
}

/// Record of one executed request, for call-order and call-count assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub operation_name: &'static str,
    pub variables: Value,
}

/// Scripted transport for orchestrator tests.
///
/// Responses are consumed in FIFO order, one per `execute` call; running out
/// of script is an error, so a test that expects two calls fails loudly on a
/// third. Handles are cheap clones sharing the same script and call log.
///
/// # Examples
///
/// ```
/// use lanyard_api::mock::MockTransport;
/// use lanyard_api::{ApiOperation, Transport};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let transport = MockTransport::new();
/// transport.enqueue_response(json!({ "data": { "tags": [] } }));
///
/// let request = ApiOperation::TagsGet { only_current: true }
///     .into_request()
///     .unwrap();
/// let response = transport.execute(&request).await.unwrap();
/// assert!(response["data"]["tags"].as_array().unwrap().is_empty());
/// assert_eq!(transport.call_count(), 1);
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Create an empty mock with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response envelope for the next unscripted call.
    pub fn enqueue_response(&self, response: Value) {
        self.script
            .lock()
            .expect("mock script lock poisoned")
            .push_back(Scripted::Respond(response));
    }

    /// Queue a transport failure.
    pub fn enqueue_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .expect("mock script lock poisoned")
            .push_back(Scripted::Fail(message.into()));
    }

    /// Queue a call that never completes, for timeout/cancellation tests.
    pub fn enqueue_hang(&self) {
        self.script
            .lock()
            .expect("mock script lock poisoned")
            .push_back(Scripted::Hang);
    }

    /// Number of `execute` calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock call log poisoned").len()
    }

    /// Snapshot of the recorded calls, in execution order.
    #[must_use]
    pub fn recorded_calls(&self) -> Vec<RecordedRequest> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<Value> {
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push(RecordedRequest {
                operation_name: request.operation_name,
                variables: request.variables.clone(),
            });

        let next = self
            .script
            .lock()
            .expect("mock script lock poisoned")
            .pop_front();

        match next {
            Some(Scripted::Respond(value)) => Ok(value),
            Some(Scripted::Fail(message)) => Err(Error::transport(message)),
            Some(Scripted::Hang) => {
                std::future::pending::<()>().await;
                unreachable!("pending future resolved")
            }
            None => Err(Error::transport(format!(
                "no scripted response for {}",
                request.operation_name
            ))),
        }
    }
}
