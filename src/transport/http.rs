use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::routing::{get, post};
use futures_util::Stream;
use futures_util::stream;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::{Instant, timeout};
use tracing::{info, warn};

use crate::broker::{Broker, BrokerStatus, SubscriberId, SubscriberKind};

pub type SharedBroker = Arc<Mutex<Broker>>;

/// Shared state handed to every handler: the broker plus the long-poll
/// timing knobs from configuration.
#[derive(Clone)]
pub struct AppState {
    pub broker: SharedBroker,
    /// Total window a poll request waits when no message arrives.
    pub poll_timeout: Duration,
    /// Per-attempt wait; a poll returns once a tick passes empty after at
    /// least one message was collected.
    pub poll_tick: Duration,
}

/// Removes a subscriber when dropped.
///
/// Whatever ends a handler future (deadline, client disconnect, task
/// cancellation) drops this guard, so the registry entry can never leak and
/// block pruning for the remaining subscribers.
struct SubscriptionGuard {
    broker: SharedBroker,
    id: SubscriberId,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        // Never panic in drop; a poisoned lock means the process is already
        // going down.
        if let Ok(mut broker) = self.broker.lock() {
            broker.unsubscribe(&self.id);
        }
    }
}

/// Builds the broker's HTTP router. Kept separate from `start_http_server`
/// so tests can drive it on an ephemeral port.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/publish", post(publish))
        .route("/status", get(status))
        .route("/messages", get(poll_messages))
        .route("/subscribe", get(subscribe_stream))
        .fallback(not_found)
        .with_state(state)
}

pub async fn start_http_server(addr: &str, state: AppState) {
    let listener = TcpListener::bind(addr).await.expect("Can't bind");

    info!("broker listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, router(state)).await {
        warn!("server error: {}", e);
    }
}

/// POST /publish: append the JSON body and fan it out in one lock
/// acquisition. A malformed body is rejected by the `Json` extractor before
/// this handler runs and leaves the broker untouched.
async fn publish(State(state): State<AppState>, Json(payload): Json<Value>) -> Json<Value> {
    {
        let mut broker = state.broker.lock().unwrap();
        broker.publish(payload);
        broker.broadcast();
    }
    Json(json!({ "status": "published" }))
}

/// GET /status: read-only snapshot of the broker counters.
async fn status(State(state): State<AppState>) -> Json<BrokerStatus> {
    let status = state.broker.lock().unwrap().status();
    Json(status)
}

/// GET /messages: long-poll subscriber.
///
/// Registers, collects from its own queue until one tick passes empty after
/// at least one message arrived, or until the total window elapses with
/// nothing, then replies with the batch. The drop guard deregisters on every
/// exit path, including client disconnect mid-wait.
async fn poll_messages(State(state): State<AppState>) -> Json<Value> {
    let (id, mut rx) = state
        .broker
        .lock()
        .unwrap()
        .subscribe(SubscriberKind::Poll);
    let _guard = SubscriptionGuard {
        broker: state.broker.clone(),
        id,
    };

    let start = Instant::now();
    let mut messages: Vec<Value> = Vec::new();

    loop {
        match timeout(state.poll_tick, rx.recv()).await {
            Ok(Some(payload)) => messages.push(payload),
            Ok(None) => break,
            Err(_) => {
                if !messages.is_empty() || start.elapsed() >= state.poll_timeout {
                    break;
                }
            }
        }
    }

    Json(json!({ "messages": messages }))
}

/// GET /subscribe: persistent SSE stream.
///
/// Registers a stream subscriber and forwards every queue item as one
/// `data: <json>` event until the connection breaks. The guard travels
/// inside the stream state, so dropping the response body deregisters the
/// subscriber.
async fn subscribe_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (id, rx) = state
        .broker
        .lock()
        .unwrap()
        .subscribe(SubscriberKind::Stream);
    let guard = SubscriptionGuard {
        broker: state.broker.clone(),
        id,
    };

    let events = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let payload = rx.recv().await?;
        let event = Event::default().data(payload.to_string());
        Some((Ok::<_, Infallible>(event), (rx, guard)))
    });

    Sse::new(events)
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
