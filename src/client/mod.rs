//! The `client` module implements the broker's CLI collaborators: a batch
//! publisher that replays a CSV file of records in priority order, and a
//! polling consumer that drains `/messages` on a fixed interval.

pub mod poller;
pub mod publisher;
