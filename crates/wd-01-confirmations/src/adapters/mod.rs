//! Adapters connecting the outbound ports to real infrastructure.

pub mod bus;

pub use bus::{NoOpEventSink, WalletBusAdapter};
