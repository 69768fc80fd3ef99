//! Recording [`Transport`] for tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::transport::{OutboundRequest, RawResponse, Transport, TransportError};

/// Replays scripted responses in order and records every request sent.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    requests: Vec<OutboundRequest>,
    responses: VecDeque<Result<RawResponse, String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and raw body.
    pub fn respond(&self, status: u16, body: impl Into<String>) {
        self.state.lock().unwrap().responses.push_back(Ok(RawResponse {
            status,
            body: body.into(),
        }));
    }

    /// Queue a JSON response.
    pub fn respond_json(&self, status: u16, body: &serde_json::Value) {
        self.respond(status, body.to_string());
    }

    /// Queue a connection failure.
    pub fn fail(&self, message: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Err(message.into()));
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// The JSON body of the `index`th request.
    pub fn request_json(&self, index: usize) -> serde_json::Value {
        let requests = self.requests();
        serde_json::from_slice(requests[index].body.as_deref().unwrap()).unwrap()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err("no scripted response".to_string()))
            .map_err(TransportError::Connection)
    }
}
