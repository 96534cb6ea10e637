//! Posts an accessibility-tree snapshot to a local endpoint over reqwest and
//! decodes the JSON reply. The transport sits behind a trait so the round
//! trip can be driven by an in-memory mock in tests.

pub mod config;
pub mod error;
pub mod mock;
pub mod probe;
pub mod reply;
pub mod snapshot;
pub mod transport;

pub use reqwest::Method;

pub use config::{DEFAULT_HOST, DEFAULT_PORT, ProbeConfig};
pub use error::{ProbeError, ProbeErrorKind, ProbeResult};
pub use mock::{MockBehavior, MockResponse, MockStateSnapshot, MockTransport};
pub use probe::{probe, run};
pub use reply::{Reply, StatusReply};
pub use snapshot::{ControlType, Element, Pattern, PatternProperty, Snapshot};
pub use transport::{
    Client, JSON_CONTENT_TYPE, ProbeBytes, ProbeFuture, ProbeRequest, ProbeResponse,
    ReqwestTransport, Transport,
};
