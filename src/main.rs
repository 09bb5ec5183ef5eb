use std::sync::{Arc, Mutex};
use std::time::Duration;

use fanhub::broker::Broker;
use fanhub::config::load_config;
use fanhub::transport::http::{AppState, start_http_server};
use fanhub::utils::logging;

#[tokio::main]
async fn main() {
    let config = load_config().expect("Failed to load configuration");
    logging::init(&config.log.level);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        broker: Arc::new(Mutex::new(Broker::new())),
        poll_timeout: Duration::from_secs(config.broker.poll_timeout_secs),
        poll_tick: Duration::from_secs(config.broker.poll_tick_secs),
    };

    start_http_server(&addr, state).await;
}
