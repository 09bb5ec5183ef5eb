pub mod engine;
pub mod registry;
pub mod store;

pub use engine::{Broker, BrokerStatus};
pub use registry::{SubscriberId, SubscriberKind};
