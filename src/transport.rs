use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    time::{Duration, Instant},
};

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client as ReqwestClient, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ProbeError, ProbeErrorKind, ProbeResult};

pub type ProbeBytes = Bytes;
pub type ProbeFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

pub const JSON_CONTENT_TYPE: &str = "application/json";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Clone, Debug)]
pub struct ProbeRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, ProbeBytes)>,
    pub body: Option<ProbeBytes>,
    pub timeout: Option<Duration>,
}

impl ProbeRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<ProbeBytes>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<ProbeBytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// `None` leaves the request unbounded.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn header(&self, name: &str) -> Option<&[u8]> {
        header_value(&self.headers, name)
    }
}

#[derive(Clone, Debug)]
pub struct ProbeResponse {
    pub status: u16,
    pub headers: Vec<(String, ProbeBytes)>,
    pub body: ProbeBytes,
    pub elapsed: Duration,
}

impl ProbeResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn header(&self, name: &str) -> Option<&[u8]> {
        header_value(&self.headers, name)
    }

    /// The body with a leading UTF-8 byte-order mark removed.
    pub fn json_body(&self) -> ProbeBytes {
        if self.body.starts_with(UTF8_BOM) {
            self.body.slice(UTF8_BOM.len()..)
        } else {
            self.body.clone()
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> ProbeResult<T> {
        sonic_rs::from_slice(&self.json_body()).map_err(|err| {
            ProbeError::parse(format!("reply is not valid JSON: {err}"), Some(self.status))
        })
    }
}

fn header_value<'a>(headers: &'a [(String, ProbeBytes)], name: &str) -> Option<&'a [u8]> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_ref())
}

pub trait Transport: Send + Sync {
    fn execute(&self, request: ProbeRequest) -> ProbeFuture<ProbeResult<ProbeResponse>>;
}

pub type SharedTransport = dyn Transport + Send + Sync;

#[derive(Clone)]
pub struct Client {
    transport: Arc<SharedTransport>,
}

impl Client {
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport::new())
    }

    pub fn with_transport<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub async fn execute(&self, request: ProbeRequest) -> ProbeResult<ProbeResponse> {
        self.transport.execute(request).await
    }

    /// Serializes `payload` and sends it as a single JSON POST. The response
    /// is returned whatever its status.
    pub async fn post_json<T: Serialize>(
        &self,
        url: impl Into<String>,
        payload: &T,
        timeout: Option<Duration>,
    ) -> ProbeResult<ProbeResponse> {
        let body = sonic_rs::to_vec(payload)?;
        let request = ProbeRequest::post(url)
            .with_header(CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE)
            .with_body(body)
            .with_timeout(timeout);
        self.execute(request).await
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: ReqwestClient::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: ProbeRequest) -> ProbeFuture<ProbeResult<ProbeResponse>> {
        let client = self.client.clone();
        Box::pin(async move {
            let start = Instant::now();
            debug!(
                method = %request.method,
                url = %request.url,
                body_len = request.body.as_ref().map_or(0, Bytes::len),
                "sending probe request"
            );
            let mut req = client.request(request.method.clone(), &request.url);

            for (key, value) in request.headers {
                let value = HeaderValue::from_bytes(value.as_ref())
                    .map_err(|err| ProbeError::internal(format!("invalid header {key}: {err}")))?;
                req = req.header(key, value);
            }

            if let Some(body) = request.body {
                req = req.body(body);
            }

            if let Some(timeout) = request.timeout {
                req = req.timeout(timeout);
            }

            let resp = req
                .send()
                .await
                .map_err(|err| ProbeError::from_reqwest(ProbeErrorKind::Send, err))?;

            let status = resp.status().as_u16();
            let headers = resp
                .headers()
                .iter()
                .map(|(name, value)| (name.to_string(), Bytes::copy_from_slice(value.as_ref())))
                .collect();
            let body = resp
                .bytes()
                .await
                .map_err(|err| ProbeError::from_reqwest(ProbeErrorKind::Receive, err))?;
            let elapsed = start.elapsed();
            debug!(status, body_len = body.len(), ?elapsed, "probe response received");

            Ok(ProbeResponse {
                status,
                headers,
                body,
                elapsed,
            })
        })
    }
}
