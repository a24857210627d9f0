//! In-process fake transport for unit tests
//!
//! [`FakeTransport`] answers requests from a per-endpoint script and records
//! every request it receives. Responses can be queued ready-made or held
//! back with [`FakeTransport::push_deferred`], which returns the sender that
//! releases the response. Deferred responses drive timeout, cancellation and
//! overlapping-call scenarios.
//!
//! A request with nothing scripted for its `(method, path)` fails with
//! `ApiError::Transport`.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::api::transport::{ApiRequest, ApiResponse, HttpTransport, Method};
use crate::error::ApiError;

#[derive(Debug)]
enum Scripted {
    Ready(Result<ApiResponse, ApiError>),
    Deferred(oneshot::Receiver<ApiResponse>),
}

/// Scripted transport double
#[derive(Debug, Default)]
pub struct FakeTransport {
    scripted: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

/// Build a JSON response
pub fn json_response(status: u16, body: serde_json::Value) -> ApiResponse {
    ApiResponse {
        status,
        body: body.to_string(),
    }
}

impl FakeTransport {
    /// Create a fake with nothing scripted
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        self.scripted
            .lock()
            .expect("FakeTransport: script lock poisoned")
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    /// Queue a JSON response for the next matching request
    pub fn push_json(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.push(method, path, Scripted::Ready(Ok(json_response(status, body))));
    }

    /// Queue a raw-body response for the next matching request
    pub fn push_raw(&self, method: Method, path: &str, status: u16, body: &str) {
        let response = ApiResponse {
            status,
            body: body.to_string(),
        };
        self.push(method, path, Scripted::Ready(Ok(response)));
    }

    /// Queue a transport-level failure for the next matching request
    pub fn push_error(&self, method: Method, path: &str, error: ApiError) {
        self.push(method, path, Scripted::Ready(Err(error)));
    }

    /// Queue a response that is only delivered once the returned sender is used.
    ///
    /// Keep the sender alive to hold the request in flight indefinitely.
    pub fn push_deferred(&self, method: Method, path: &str) -> oneshot::Sender<ApiResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Deferred(rx));
        tx
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .expect("FakeTransport: request log poisoned")
            .clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .expect("FakeTransport: request log poisoned")
            .len()
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let key = (request.method, request.path.clone());
        self.requests
            .lock()
            .expect("FakeTransport: request log poisoned")
            .push(request);

        let next = self
            .scripted
            .lock()
            .expect("FakeTransport: script lock poisoned")
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Ready(outcome)) => outcome,
            Some(Scripted::Deferred(rx)) => rx
                .await
                .map_err(|_| ApiError::Transport("deferred response dropped".to_string())),
            None => Err(ApiError::Transport(format!(
                "no scripted response for {} {}",
                key.0, key.1
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_responses_are_consumed_in_order() {
        let fake = FakeTransport::new();
        fake.push_json(Method::Get, "/a", 200, json!(1));
        fake.push_json(Method::Get, "/a", 500, json!(2));

        let first = fake.send(ApiRequest::get("/a")).await.unwrap();
        let second = fake.send(ApiRequest::get("/a")).await.unwrap();
        let third = fake.send(ApiRequest::get("/a")).await;

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 500);
        assert!(matches!(third, Err(ApiError::Transport(_))));
        assert_eq!(fake.request_count(), 3);
    }

    #[tokio::test]
    async fn test_deferred_response_released_by_sender() {
        let fake = FakeTransport::new();
        let tx = fake.push_deferred(Method::Get, "/slow");
        tx.send(json_response(200, json!({"ok": true}))).unwrap();

        let response = fake.send(ApiRequest::get("/slow")).await.unwrap();
        assert_eq!(response.body, r#"{"ok":true}"#);
    }
}
