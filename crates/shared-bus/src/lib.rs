//! # Shared Bus - Event Bus for Approver Surfaces and Internal Observers
//!
//! Carries confirmation-queue snapshots and settlement events from the
//! background controller to its subscribers.
//!
//! ## Rules
//!
//! - The controller owns the canonical queue state; subscribers only ever
//!   receive immutable [`shared_types::QueueSnapshot`] values.
//! - No subscriber may mutate shared state through the bus; resolution goes
//!   back through the controller's API, never through an event.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Controller  │                    │ Approver UI  │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, WalletEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Current protocol version for event bus messages.
pub const PROTOCOL_VERSION: u16 = 1;

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
