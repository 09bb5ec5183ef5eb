use thiserror::Error;

/// Errors surfaced by the CLI collaborators.
///
/// The broker core itself has no failure modes worth an error type;
/// everything here is about reading record files and talking to the broker
/// over HTTP.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to read record file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid record file: {0}")]
    InvalidRecords(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("broker returned {status} for {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },
}
