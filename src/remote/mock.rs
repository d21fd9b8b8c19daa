//! In-process transport with canned responses, for tests and offline demos.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::Value;

use crate::error::{JypError, Result};

use super::{ApiRequest, Envelope, Transport};

/// Replies to each `(method, path)` with queued envelopes.
///
/// The last queued envelope for a route is sticky: it keeps answering once
/// the queue is down to one entry. Routes are matched on the unescaped path.
/// Every request that would reach the network is recorded; requests with
/// invalid segments fail first, as they do on [`super::HttpTransport`].
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Envelope<Value>>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a route.
    pub fn respond(&self, method: Method, path: &str, envelope: Envelope<Value>) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(envelope);
        self
    }

    /// Queue a success envelope wrapping `data`.
    pub fn respond_ok(&self, method: Method, path: &str, data: Value) -> &Self {
        self.respond(method, path, Envelope::success(data))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    /// Number of recorded requests to a route.
    pub fn count(&self, method: &Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| &r.method == method && r.path() == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Envelope<Value>> {
        request.check_segments()?;
        let key = (request.method.clone(), request.path());
        self.requests.lock().push(request);

        let mut routes = self.routes.lock();
        let queue = routes
            .get_mut(&key)
            .ok_or_else(|| JypError::Other(format!("no response for {} {}", key.0, key.1)))?;
        let envelope = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        envelope.ok_or_else(|| JypError::Other(format!("no response for {} {}", key.0, key.1)))
    }
}
