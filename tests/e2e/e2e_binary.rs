use assert_cmd::Command;
use axum::Router;
use axum::body::Bytes;
use axum::http::{StatusCode, header};
use axum::routing::post;
use predicates::str::contains;
use sonic_rs::Value;
use tokio::net::TcpListener;
use uia_probe::{DEFAULT_PORT, Snapshot};

const SERVED_REPLY: &str =
    r#"{"status":"200","statusText":"OK","data":{"id":"audio","elements":"7"}}"#;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("uia-probe").expect("binary is built");
    cmd.env_remove("RUST_LOG");
    cmd
}

type JsonReply = (StatusCode, [(header::HeaderName, &'static str); 1], &'static str);

async fn snapshot_handler(body: Bytes) -> JsonReply {
    let json = [(header::CONTENT_TYPE, "application/json")];
    match Snapshot::from_json(&body) {
        Ok(snapshot) if snapshot == Snapshot::audio() => (StatusCode::OK, json, SERVED_REPLY),
        _ => (StatusCode::BAD_REQUEST, json, r#"{"error":"unexpected payload"}"#),
    }
}

// Both cases share the fixed port, so they run in sequence.
#[tokio::test(flavor = "multi_thread")]
async fn e2e_binary_prints_reply_from_fixed_endpoint_and_fails_without_one() {
    tokio::task::spawn_blocking(|| {
        cmd()
            .assert()
            .failure()
            .stdout("")
            .stderr(contains("Error:"));
    })
    .await
    .expect("refused run completes");

    let listener = TcpListener::bind(("127.0.0.1", DEFAULT_PORT))
        .await
        .expect("bind fixed probe port");
    let app = Router::new().route("/", post(snapshot_handler));
    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let stdout = tokio::task::spawn_blocking(|| {
        cmd().assert().success().get_output().stdout.clone()
    })
    .await
    .expect("served run completes");
    task.abort();

    let printed: Value = sonic_rs::from_slice(&stdout).expect("stdout is the decoded reply");
    let served: Value = sonic_rs::from_str(SERVED_REPLY).expect("served reply is json");
    assert_eq!(printed, served);
}
