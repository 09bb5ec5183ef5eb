//! Polling consumer: long-polls the broker's `/messages` endpoint on a fixed
//! interval and prints each received payload.
//!
//! Usage: `subscriber [broker-url] [interval-secs]`

use std::time::Duration;

use fanhub::client::poller;
use fanhub::utils::logging;

#[tokio::main]
async fn main() {
    logging::init("info");

    let mut args = std::env::args().skip(1);
    let base_url = args
        .next()
        .unwrap_or_else(|| "http://localhost:8000".to_string());
    let interval = args
        .next()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(1));

    let client = reqwest::Client::new();
    poller::run(&client, &base_url, interval).await;
}
