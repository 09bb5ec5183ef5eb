//! # Fanhub
//!
//! `fanhub` is a minimalist, in-memory publish/subscribe broker exposed over
//! HTTP. Producers POST payloads; consumers retrieve them through short-lived
//! long-poll requests or a persistent Server-Sent-Events stream. Every
//! message is delivered to every subscriber active when it arrives, and a
//! message is evicted once the whole active set has received it.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `broker`: the message store, subscriber registry and the broadcast
//!   engine that fans payloads out and prunes delivered messages.
//! - `transport`: the axum HTTP surface (publish, status, long-poll, SSE).
//! - `client`: the CLI collaborators (CSV batch publisher, polling consumer).
//! - `config`: loading and merging server configuration.
//! - `utils`: shared utilities such as error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod transport;
pub mod utils;
