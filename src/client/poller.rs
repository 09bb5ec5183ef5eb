use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::utils::error::ClientError;

#[derive(Debug, Deserialize)]
struct MessageBatch {
    messages: Vec<Value>,
}

/// One long-poll round trip: GET /messages and return the batch, which is
/// empty when the broker's poll window elapsed without a publish.
pub async fn fetch_batch(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<Vec<Value>, ClientError> {
    let url = format!("{base_url}/messages");
    let resp = client.get(&url).send().await?;
    if !resp.status().is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: resp.status(),
            url,
        });
    }
    let batch: MessageBatch = resp.json().await?;
    Ok(batch.messages)
}

/// Polls the broker forever, printing each received payload. A transport
/// error is logged and the loop carries on after the interval.
pub async fn run(client: &reqwest::Client, base_url: &str, interval: Duration) {
    loop {
        match fetch_batch(client, base_url).await {
            Ok(messages) => {
                for msg in messages {
                    println!("Received: {msg}");
                }
            }
            Err(e) => warn!("poll failed: {e}"),
        }
        tokio::time::sleep(interval).await;
    }
}
