use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 4119;

/// Where the snapshot is sent. The binary always uses [`ProbeConfig::default`];
/// the builders exist for embedding callers and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeConfig {
    endpoint: String,
    timeout: Option<Duration>,
}

impl ProbeConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoint: format!("http://{DEFAULT_HOST}:{DEFAULT_PORT}"),
            timeout: None,
        }
    }
}
