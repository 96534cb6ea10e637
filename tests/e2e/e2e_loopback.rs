use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::http::{StatusCode, header};
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::time::sleep;
use uia_probe::{Client, ProbeConfig, ProbeErrorKind, Snapshot, probe};

#[tokio::test]
async fn e2e_audio_snapshot_roundtrip() {
    let server = TestServer::start().await;
    let config = ProbeConfig::default().with_endpoint(server.url("/"));

    let reply = probe(&Client::new(), &config, &Snapshot::audio())
        .await
        .expect("loopback endpoint should answer with json");

    let envelope = reply
        .status_envelope()
        .expect("endpoint answers with a status envelope");
    assert_eq!(envelope.status, "200");
    assert_eq!(envelope.status_text, "OK");
    assert_eq!(envelope.data.get("id").map(String::as_str), Some("audio"));
    assert_eq!(envelope.data.get("elements").map(String::as_str), Some("7"));
}

#[tokio::test]
async fn e2e_rejected_payload_reply_is_still_decoded() {
    let server = TestServer::start().await;
    let config = ProbeConfig::default().with_endpoint(server.url("/strict"));

    let reply = probe(&Client::new(), &config, &Snapshot::audio())
        .await
        .expect("a json error body still decodes");

    assert_eq!(reply.status(), 422);
    let envelope = reply.status_envelope().expect("error body is an envelope");
    assert_eq!(envelope.status_text, "Unprocessable Entity");
}

#[tokio::test]
async fn e2e_plain_text_reply_is_a_parse_error() {
    let server = TestServer::start().await;
    let config = ProbeConfig::default().with_endpoint(server.url("/text"));

    let err = probe(&Client::new(), &config, &Snapshot::audio())
        .await
        .expect_err("plain text should not decode");

    assert_eq!(err.kind(), ProbeErrorKind::Parse);
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn e2e_connection_refused_is_a_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let config = ProbeConfig::default().with_endpoint(format!("http://{addr}"));
    let err = probe(&Client::new(), &config, &Snapshot::audio())
        .await
        .expect_err("nothing is listening");

    assert_eq!(err.kind(), ProbeErrorKind::Connect);
}

#[tokio::test]
async fn e2e_configured_timeout_triggers() {
    let server = TestServer::start().await;
    let config = ProbeConfig::default()
        .with_endpoint(server.url("/slow"))
        .with_timeout(Duration::from_millis(200));

    let err = probe(&Client::new(), &config, &Snapshot::audio())
        .await
        .expect_err("slow endpoint should exceed the timeout");

    assert_eq!(err.kind(), ProbeErrorKind::Timeout);
}

struct TestServer {
    base_url: String,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let app = Router::new()
            .route("/", post(snapshot_handler))
            .route("/strict", post(strict_handler))
            .route("/text", post(text_handler))
            .route("/slow", post(slow_handler));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let base_url = format!("http://{}", addr);

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { base_url, task }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

type JsonReply = (StatusCode, [(header::HeaderName, &'static str); 1], String);

fn json_reply(status: StatusCode, body: String) -> JsonReply {
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

async fn snapshot_handler(body: Bytes) -> JsonReply {
    match Snapshot::from_json(&body) {
        Ok(snapshot) => json_reply(
            StatusCode::OK,
            format!(
                r#"{{"status":"200","statusText":"OK","data":{{"id":"{}","elements":"{}"}}}}"#,
                snapshot.id(),
                snapshot.walk().count()
            ),
        ),
        Err(err) => json_reply(
            StatusCode::BAD_REQUEST,
            format!(
                r#"{{"status":"400","statusText":"Bad Request","data":{{"error":"{:?}"}}}}"#,
                err.kind()
            ),
        ),
    }
}

async fn strict_handler() -> JsonReply {
    json_reply(
        StatusCode::UNPROCESSABLE_ENTITY,
        r#"{"status":"422","statusText":"Unprocessable Entity"}"#.to_string(),
    )
}

async fn text_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "snapshot stored")
}

async fn slow_handler() -> (StatusCode, &'static str) {
    sleep(Duration::from_millis(1500)).await;
    (StatusCode::OK, "{}")
}
