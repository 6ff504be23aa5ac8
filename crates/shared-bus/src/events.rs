//! # Wallet Events
//!
//! Defines all event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::{ConfirmationKind, QueueSnapshot, RequestId};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WalletEvent {
    /// The pending-confirmation queue changed; here is the new snapshot.
    /// Published after every enqueue, settlement, and reset.
    QueueUpdated(QueueSnapshot),

    /// One confirmation settled.
    /// `approved` is false when the requester's future was rejected
    /// (validation failure, signer failure).
    ConfirmationSettled {
        id: RequestId,
        kind: ConfirmationKind,
        approved: bool,
    },

    /// Every outstanding confirmation was rejected by a wallet reset.
    WalletReset {
        /// Number of futures rejected.
        rejected: usize,
    },

    /// The keyring was forced into the locked state by the unlock policy.
    KeyringLocked,
}

impl WalletEvent {
    /// The topic this event belongs to, for subscription filtering.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::QueueUpdated(_) | Self::ConfirmationSettled { .. } => EventTopic::Confirmations,
            Self::WalletReset { .. } => EventTopic::Reset,
            Self::KeyringLocked => EventTopic::Keyring,
        }
    }

    /// Stable event name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::QueueUpdated(_) => "queue_updated",
            Self::ConfirmationSettled { .. } => "confirmation_settled",
            Self::WalletReset { .. } => "wallet_reset",
            Self::KeyringLocked => "keyring_locked",
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTopic {
    /// Queue snapshots and per-request settlements.
    Confirmations,
    /// Keyring lock-state changes.
    Keyring,
    /// Wallet reset notifications.
    Reset,
}

/// Filter describing which events a subscriber wants.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Topics to receive. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Receive every event.
    #[must_use]
    pub fn all() -> Self {
        Self { topics: Vec::new() }
    }

    /// Receive only the given topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Whether an event passes this filter.
    #[must_use]
    pub fn matches(&self, event: &WalletEvent) -> bool {
        self.topics.is_empty() || self.topics.contains(&event.topic())
    }
}
