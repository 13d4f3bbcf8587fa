//! End-to-end tests: bridge router, real HTTP phone client, fake phone.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use gate_bridge::{create_router, spawn_heartbeat, AppState};
use gate_phone::{HttpPhone, PhoneConfig};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

const KEY: &str = "bridge-key";

async fn serve(app: Router) -> u16 {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(l) => l,
        Err(e) => panic!("bind failed: {e}"),
    };
    let port = match listener.local_addr() {
        Ok(a) => a.port(),
        Err(e) => panic!("local_addr failed: {e}"),
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    port
}

/// Fake phone answering opens with `statuses` in order, then 200.
fn scripted_phone(statuses: Vec<StatusCode>) -> Router {
    let calls = Arc::new(AtomicUsize::new(0));
    let statuses = Arc::new(statuses);
    Router::new()
        .route(
            "/salt/open",
            post(move |State(calls): State<Arc<AtomicUsize>>| {
                let statuses = Arc::clone(&statuses);
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    let status = statuses.get(n).copied().unwrap_or(StatusCode::OK);
                    (status, format!("call {n}"))
                }
            }),
        )
        .route("/ping", get(|| async { "pong" }))
        .with_state(calls)
}

/// Fake phone that sends `head` for the first request and then goes quiet.
async fn stalling_phone(head: &'static [u8]) -> u16 {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(l) => l,
        Err(e) => panic!("bind failed: {e}"),
    };
    let port = match listener.local_addr() {
        Ok(a) => a.port(),
        Err(e) => panic!("local_addr failed: {e}"),
    };
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let _ = stream.write_all(head).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
    port
}

fn bridge_for(port: u16, min_interval: Duration) -> AppState {
    let phone = HttpPhone::new(
        PhoneConfig::new("127.0.0.1", port, "salt", "tok")
            .with_timeouts(Duration::from_millis(300), Duration::from_millis(200)),
    );
    AppState::new(KEY, Arc::new(phone), min_interval)
}

async fn call(state: &AppState, method: &str, uri: &str) -> (StatusCode, Value) {
    let req = match Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-Key", KEY)
        .body(Body::empty())
    {
        Ok(r) => r,
        Err(e) => panic!("failed to build request: {e}"),
    };
    let resp = match create_router(state.clone()).oneshot(req).await {
        Ok(r) => r,
        Err(e) => panic!("handler error: {e}"),
    };
    let status = resp.status();
    let bytes = match axum::body::to_bytes(resp.into_body(), 4096).await {
        Ok(b) => b,
        Err(e) => panic!("failed to read body: {e}"),
    };
    match serde_json::from_slice(&bytes) {
        Ok(v) => (status, v),
        Err(e) => panic!("invalid JSON: {e}"),
    }
}

#[tokio::test]
async fn open_then_limited_then_phone_error_after_cooldown() {
    let port = serve(scripted_phone(vec![StatusCode::OK, StatusCode::INTERNAL_SERVER_ERROR])).await;
    let state = bridge_for(port, Duration::from_millis(200));

    let (status, body) = call(&state, "POST", "/api/gates/2/open").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = call(&state, "POST", "/api/gates/2/open").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, json!({"error": "Too Many Requests for this gate"}));

    tokio::time::sleep(Duration::from_millis(250)).await;

    let (status, body) = call(&state, "POST", "/api/gates/2/open").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error = body["error"].as_str().unwrap_or_default();
    assert!(error.contains("Phone returned 500"), "got {error}");
    assert_eq!(body["body"], "call 1");
}

#[tokio::test]
async fn slow_phone_yields_timeout_and_keeps_slot() {
    let app = Router::new().route(
        "/salt/open",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let port = serve(app).await;
    let state = bridge_for(port, Duration::from_secs(60));

    let (status, body) = call(&state, "POST", "/api/gates/1/open").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "Phone bridge error: Phone timeout"}));

    let (status, _) = call(&state, "POST", "/api/gates/1/open").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn phone_answering_ok_with_stalled_body_opens_gate() {
    let port = stalling_phone(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nopen").await;
    let state = bridge_for(port, Duration::from_secs(60));

    let (status, body) = call(&state, "POST", "/api/gates/3/open").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn heartbeat_task_feeds_health_endpoint() {
    let port = serve(scripted_phone(vec![])).await;
    let state = bridge_for(port, Duration::from_secs(5));

    let (_, body) = call(&state, "GET", "/health").await;
    assert_eq!(body["phone"]["ok"], false);
    assert_eq!(body["phone"]["seenAt"], 0);

    let handle = spawn_heartbeat(
        Arc::clone(&state.phone),
        Arc::clone(&state.health),
        Duration::from_millis(250),
    );
    let mut snap = state.health.snapshot();
    for _ in 0..50 {
        if snap.reachable {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        snap = state.health.snapshot();
    }
    handle.abort();

    let (status, body) = call(&state, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["phone"]["ok"], true);
    assert!(body["phone"]["rttMs"].is_u64(), "rttMs must be a number, got {body}");
    assert!(body["phone"]["seenAt"].as_i64().unwrap_or_default() > 0);
}
