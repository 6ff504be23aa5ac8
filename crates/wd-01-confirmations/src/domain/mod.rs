//! Domain layer: the arena, dedup fingerprint, settled-id cache, and errors.

pub mod arena;
pub mod entities;
pub mod errors;
pub mod fingerprint;
pub mod settled;

pub use arena::{
    ConfirmationArena, PendingConfirmation, PendingEntry, ResponseValidator, SettledOutcome,
};
pub use entities::*;
pub use errors::ConfirmationError;
pub use settled::SettledIdCache;
