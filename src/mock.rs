//! In-memory transport so probe behavior can be checked without a listener.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Instant,
};

use bytes::Bytes;
use serde::Serialize;

use crate::error::{ProbeError, ProbeErrorKind, ProbeResult};
use crate::transport::{ProbeBytes, ProbeFuture, ProbeRequest, ProbeResponse, Transport};

#[derive(Clone, Debug, Default)]
pub enum MockBehavior {
    #[default]
    Pass,
    ConnectError(String),
    SendError {
        status: Option<u16>,
        reason: String,
    },
    ReceiveError {
        status: Option<u16>,
        reason: String,
    },
    TimeoutError(String),
    Drop,
}

impl MockBehavior {
    pub fn connect_error(reason: impl Into<String>) -> Self {
        Self::ConnectError(reason.into())
    }

    pub fn send_error(reason: impl Into<String>, status: Option<u16>) -> Self {
        Self::SendError {
            status,
            reason: reason.into(),
        }
    }

    pub fn receive_error(reason: impl Into<String>, status: Option<u16>) -> Self {
        Self::ReceiveError {
            status,
            reason: reason.into(),
        }
    }

    pub fn timeout_error(reason: impl Into<String>) -> Self {
        Self::TimeoutError(reason.into())
    }

    fn into_error(self) -> Option<ProbeError> {
        match self {
            Self::Pass => None,
            Self::ConnectError(reason) => Some(ProbeError::connect(reason)),
            Self::SendError { status, reason } => Some(ProbeError::send(reason, status)),
            Self::ReceiveError { status, reason } => Some(ProbeError::receive(reason, status)),
            Self::TimeoutError(reason) => Some(ProbeError::timeout(reason)),
            Self::Drop => Some(ProbeError::timeout("mock transport dropped response")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, ProbeBytes)>,
    pub body: ProbeBytes,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<ProbeBytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<ProbeBytes>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body.into())
    }

    pub fn json<T: Serialize>(status: u16, payload: &T) -> ProbeResult<Self> {
        let body = sonic_rs::to_vec(payload)?;
        Ok(Self::new(status, body).with_header("content-type", "application/json"))
    }
}

#[derive(Clone, Debug)]
pub struct MockStateSnapshot {
    pub request_count: usize,
    pub last_url: Option<String>,
    pub last_status: Option<u16>,
    pub last_error: Option<ProbeErrorKind>,
    pub behavior_remaining: usize,
    pub response_queue_len: usize,
}

#[derive(Debug, Default)]
struct MockState {
    request_count: usize,
    last_url: Option<String>,
    last_status: Option<u16>,
    last_error: Option<ProbeErrorKind>,
    behaviors: VecDeque<MockBehavior>,
    responses: VecDeque<MockResponse>,
    outbound_log: Vec<ProbeRequest>,
}

#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behaviors(behaviors: impl IntoIterator<Item = MockBehavior>) -> Self {
        let transport = Self::new();
        transport.lock("seeding behaviors").behaviors = behaviors.into_iter().collect();
        transport
    }

    pub fn queue_response(&self, response: MockResponse) {
        self.lock("queueing response").responses.push_back(response);
    }

    pub fn outbound(&self) -> Vec<ProbeRequest> {
        self.lock("reading outbound log").outbound_log.clone()
    }

    pub fn snapshot(&self) -> MockStateSnapshot {
        let state = self.lock("taking snapshot");
        MockStateSnapshot {
            request_count: state.request_count,
            last_url: state.last_url.clone(),
            last_status: state.last_status,
            last_error: state.last_error,
            behavior_remaining: state.behaviors.len(),
            response_queue_len: state.responses.len(),
        }
    }

    fn lock(&self, action: &str) -> std::sync::MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|_| panic!("mock transport mutex poisoned while {action}"))
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: ProbeRequest) -> ProbeFuture<ProbeResult<ProbeResponse>> {
        let transport = self.clone();
        Box::pin(async move {
            let start = Instant::now();
            let mut state = transport.lock("executing request");
            state.request_count += 1;
            state.last_url = Some(request.url.clone());
            state.outbound_log.push(request);

            let behavior = state.behaviors.pop_front().unwrap_or_default();
            if let Some(error) = behavior.into_error() {
                state.last_error = Some(error.kind());
                state.last_status = error.status();
                return Err(error);
            }

            let response = state
                .responses
                .pop_front()
                .unwrap_or_else(|| MockResponse::new(200, Bytes::new()));
            state.last_error = None;
            state.last_status = Some(response.status);

            Ok(ProbeResponse {
                status: response.status,
                headers: response.headers,
                body: response.body,
                elapsed: start.elapsed(),
            })
        })
    }
}
