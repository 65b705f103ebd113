//! Single-peer TCP endpoint polled from the tick loop

mod endpoint;

pub use endpoint::{BridgeEndpoint, ConnectionEvent};
