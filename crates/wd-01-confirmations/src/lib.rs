//! # Confirmation Queue Subsystem
//!
//! **Subsystem ID:** 1
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Mediates between requesters (in-page dApps, internal wallet flows) that
//! ask for a sensitive operation and the human approver who must explicitly
//! authorize it through a separate surface. Each request is settled exactly
//! once, duplicates are rejected before they reach the approver, key
//! material is only unlocked when policy requires it, and a wallet reset
//! cancels every outstanding request.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Exactly-once settlement per id | `domain/arena.rs` - `take()` is the only removal |
//! | INVARIANT-2 | No duplicate (kind, origin, fingerprint) | `service.rs` - `enqueue()` dedup check |
//! | INVARIANT-3 | Request and resolver removed atomically | `domain/arena.rs` - single entry per id |
//! | INVARIANT-4 | Signing only after explicit approval | `service.rs` - decorator runs inside `resolve()` |
//! | INVARIANT-5 | Reset leaves no pending future | `service.rs` - `reset_all()` drains and rejects |
//!
//! ## Request State Machine
//!
//! ```text
//! [QUEUED] ──resolve──→ [RESOLVING] ──settle──→ [SETTLED]
//!     │                                             ↑
//!     └──────────────── reset_all ──────────────────┘
//! ```
//!
//! Terminal states are never re-visited: settlement removes the arena entry,
//! so a second `resolve` for the same id is a hard `NotFound`, never a
//! silent no-op.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - Event sink implementations over shared-bus         │
//! │  ipc/      - Caller-surface authorization and message handler   │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - ConfirmationApi trait                      │
//! │  ports/outbound.rs - ChainSigner, KeyringPolicy, Notifier,      │
//! │                      EventSink, TimeSource traits               │
//! │  service.rs        - ConfirmationService (Lifecycle Controller) │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/arena.rs       - ConfirmationArena (request + resolver) │
//! │  domain/fingerprint.rs - canonical dedup fingerprint            │
//! │  domain/settled.rs     - SettledIdCache                         │
//! │  domain/entities.rs    - ConfirmationConfig, shared re-exports  │
//! │  domain/errors.rs      - ConfirmationError enum                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

pub use domain::*;
pub use service::ConfirmationService;
