//! Batch publisher: reads a CSV file of records, sorts them by ascending
//! priority and publishes each one to the broker.
//!
//! Usage: `publisher [records.csv] [broker-url]`

use std::path::PathBuf;
use std::process::ExitCode;

use fanhub::client::publisher::{publish_records, read_records};
use fanhub::utils::logging;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init("info");

    let mut args = std::env::args().skip(1);
    let path = PathBuf::from(args.next().unwrap_or_else(|| "people.csv".to_string()));
    let base_url = args
        .next()
        .unwrap_or_else(|| "http://localhost:8000".to_string());

    let records = match read_records(&path) {
        Ok(records) => records,
        Err(e) => {
            error!("could not read {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let client = reqwest::Client::new();
    let published = publish_records(&client, &base_url, &records).await;

    println!("\nDone. Total messages published: {published}");
    ExitCode::SUCCESS
}
