use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::ProbeConfig;
use crate::error::ProbeResult;
use crate::reply::Reply;
use crate::snapshot::Snapshot;
use crate::transport::Client;

/// Posts `snapshot` once to the configured endpoint and decodes the reply.
///
/// Nothing is retried and the HTTP status is not checked: a non-2xx reply
/// with a JSON body is returned like any other.
pub async fn probe(
    client: &Client,
    config: &ProbeConfig,
    snapshot: &Snapshot,
) -> ProbeResult<Reply> {
    let span = info_span!("probe", id = snapshot.id(), endpoint = config.endpoint());
    async move {
        let response = client
            .post_json(config.endpoint(), snapshot, config.timeout())
            .await?;
        if !response.is_success() {
            warn!(
                status = response.status(),
                "endpoint answered with a non-success status"
            );
        }

        let reply = Reply::from_response(&response)?;
        match reply.status_envelope() {
            Some(envelope) => info!(
                status = %envelope.status,
                status_text = %envelope.status_text,
                entries = envelope.data.len(),
                "status envelope received"
            ),
            None => debug!("reply is not a status envelope"),
        }
        Ok(reply)
    }
    .instrument(span)
    .await
}

/// The fixed round trip: the audio snapshot to `http://localhost:4119`.
pub async fn run() -> ProbeResult<Reply> {
    probe(&Client::new(), &ProbeConfig::default(), &Snapshot::audio()).await
}
