//! The `transport` module is responsible for the broker's HTTP surface.
//!
//! It implements the axum router exposing publish, status, long-poll and
//! SSE-stream endpoints, translating wire requests into broker operations
//! and queue contents back into JSON or event-stream bytes.

pub mod http;

#[cfg(test)]
mod tests;
