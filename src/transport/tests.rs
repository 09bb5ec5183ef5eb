use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};

use crate::broker::Broker;
use crate::transport::http::{AppState, router};

// Serves the real router on an ephemeral port and returns the base URL plus
// the state handle for poking at broker internals mid-test.
async fn spawn_server() -> (String, AppState) {
    let state = AppState {
        broker: Arc::new(Mutex::new(Broker::new())),
        poll_timeout: Duration::from_secs(2),
        poll_tick: Duration::from_millis(100),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();

    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

// Bounded wait for the registry to reach `count` subscribers; panics rather
// than hanging the test if it never does.
async fn wait_for_subscribers(state: &AppState, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if state.broker.lock().unwrap().status().active_subscribers == count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("subscriber count never settled");
}

async fn get_status(client: &reqwest::Client, base: &str) -> Value {
    client
        .get(format!("{base}/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_publish_then_status() {
    let (base, _state) = spawn_server().await;
    let client = reqwest::Client::new();

    for n in 1..=2 {
        let resp = client
            .post(format!("{base}/publish"))
            .json(&json!({ "n": n }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.json::<Value>().await.unwrap(),
            json!({ "status": "published" })
        );
    }

    // Nobody subscribed, so both messages stay retained.
    let status = get_status(&client, &base).await;
    assert_eq!(status, json!({ "stored_messages": 2, "active_subscribers": 0 }));
}

#[tokio::test]
async fn test_poll_returns_backlog_in_order_and_store_drains() {
    let (base, _state) = spawn_server().await;
    let client = reqwest::Client::new();

    for n in 1..=2 {
        client
            .post(format!("{base}/publish"))
            .json(&json!({ "n": n }))
            .send()
            .await
            .unwrap();
    }

    let batch: Value = client
        .get(format!("{base}/messages"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(batch, json!({ "messages": [{ "n": 1 }, { "n": 2 }] }));

    let status = get_status(&client, &base).await;
    assert_eq!(status, json!({ "stored_messages": 0, "active_subscribers": 0 }));
}

#[tokio::test]
async fn test_empty_poll_times_out_and_deregisters() {
    let (base, state) = spawn_server().await;
    let client = reqwest::Client::new();

    let batch: Value = client
        .get(format!("{base}/messages"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(batch, json!({ "messages": [] }));

    assert_eq!(state.broker.lock().unwrap().status().active_subscribers, 0);
}

#[tokio::test]
async fn test_sse_stream_receives_subsequent_publishes() {
    let (base, state) = spawn_server().await;
    let client = reqwest::Client::new();

    let mut resp = client
        .get(format!("{base}/subscribe"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );

    // Wait until the stream subscriber is actually registered before
    // publishing, otherwise the publish races the subscription.
    wait_for_subscribers(&state, 1).await;

    client
        .post(format!("{base}/publish"))
        .json(&json!({ "x": 1 }))
        .send()
        .await
        .unwrap();

    let chunk = resp.chunk().await.unwrap().expect("stream should yield");
    let text = String::from_utf8(chunk.to_vec()).unwrap();
    assert!(text.contains("data: {\"x\":1}"), "unexpected event: {text}");

    // Dropping the response tears down the stream, and the guard removes the
    // subscriber on the server side.
    drop(resp);
    wait_for_subscribers(&state, 0).await;
}

#[tokio::test]
async fn test_unknown_route_is_404_json() {
    let (base, _state) = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/nope")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(
        resp.json::<Value>().await.unwrap(),
        json!({ "error": "not found" })
    );
}

#[tokio::test]
async fn test_malformed_publish_rejected_broker_keeps_serving() {
    let (base, _state) = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/publish"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());

    // The bad body left no trace and valid publishes still work.
    let resp = client
        .post(format!("{base}/publish"))
        .json(&json!({ "ok": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let status = get_status(&client, &base).await;
    assert_eq!(status["stored_messages"], json!(1));
}
