use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sonic_rs::Value;

use crate::error::ProbeResult;
use crate::transport::ProbeResponse;

/// The decoded body of a probe reply. Any JSON document is accepted.
#[derive(Clone, Debug)]
pub struct Reply {
    status: u16,
    raw: Bytes,
    document: Value,
}

/// Status envelope returned by the harness's result service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: String,
    #[serde(rename = "statusText")]
    pub status_text: String,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl Reply {
    /// Decodes the response body whatever the HTTP status. An empty body is
    /// not JSON and fails like any other malformed body; a leading byte-order
    /// mark is skipped.
    pub fn from_response(response: &ProbeResponse) -> ProbeResult<Self> {
        let document = response.json()?;
        Ok(Self {
            status: response.status(),
            raw: response.json_body(),
            document,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn into_document(self) -> Value {
        self.document
    }

    /// The reply as a [`StatusReply`], when it has that shape.
    pub fn status_envelope(&self) -> Option<StatusReply> {
        sonic_rs::from_slice(&self.raw).ok()
    }

    pub fn render(&self) -> ProbeResult<String> {
        Ok(sonic_rs::to_string_pretty(&self.document)?)
    }
}
