//! IPC boundary: message payloads, caller-surface authorization, and the
//! handler mapping messages onto the service.

pub mod handler;
pub mod payloads;
pub mod security;

pub use handler::IpcHandler;
pub use payloads::*;
pub use security::{AuthorizationRules, CallerSurface};
