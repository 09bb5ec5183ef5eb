//! The `utils` module provides shared utilities used across the crate:
//! the client-side error type and tracing initialization.

pub mod error;
pub mod logging;
