use thiserror::Error;

pub type ProbeResult<T> = Result<T, ProbeError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeErrorKind {
    Connect,
    Send,
    Receive,
    Timeout,
    Parse,
    Internal,
}

/// Every failure of a probe round trip. Nothing is retried, so there is no
/// retryable flag: the caller only learns which phase failed.
#[derive(Clone, Debug, Error)]
#[error("probe error {kind:?} status={status:?} {message}")]
pub struct ProbeError {
    kind: ProbeErrorKind,
    status: Option<u16>,
    message: String,
}

impl ProbeError {
    pub fn new(kind: ProbeErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(ProbeErrorKind::Connect, None, message)
    }

    pub fn send(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::new(ProbeErrorKind::Send, status, message)
    }

    pub fn receive(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::new(ProbeErrorKind::Receive, status, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProbeErrorKind::Timeout, None, message)
    }

    pub fn parse(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::new(ProbeErrorKind::Parse, status, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProbeErrorKind::Internal, None, message)
    }

    /// Classifies a reqwest failure. Connection and timeout failures win over
    /// the phase the caller was in.
    pub(crate) fn from_reqwest(phase: ProbeErrorKind, err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let kind = if err.is_connect() {
            ProbeErrorKind::Connect
        } else if err.is_timeout() {
            ProbeErrorKind::Timeout
        } else {
            phase
        };
        Self::new(kind, status, err.to_string())
    }

    pub fn kind(&self) -> ProbeErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<sonic_rs::Error> for ProbeError {
    fn from(err: sonic_rs::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}
