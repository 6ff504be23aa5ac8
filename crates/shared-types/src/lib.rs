//! # Shared Types Crate
//!
//! This crate contains all domain entities shared across the wallet
//! background runtime: request identity, requester origins, and the
//! confirmation kind/payload/result families.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Closed Kind Set**: `ConfirmationKind` is a sum type; an unknown kind
//!   is a compile-time-impossible state, never a runtime branch.
//! - **No Redundant Identity**: the origin recorded on a request comes from
//!   the caller surface, payloads MUST NOT carry their own origin fields.

pub mod confirmations;
pub mod entities;

pub use confirmations::*;
pub use entities::*;
