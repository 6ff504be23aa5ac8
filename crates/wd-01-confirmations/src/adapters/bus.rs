//! Event sink adapter over the shared bus.
//!
//! Publishes queue snapshots and settlement events for approver surfaces
//! and internal observers.

use std::sync::Arc;

use async_trait::async_trait;

use shared_bus::{EventPublisher, InMemoryEventBus, WalletEvent};
use shared_types::{ConfirmationKind, QueueSnapshot, RequestId};

use crate::ports::outbound::EventSink;

/// Publishes controller events to a `shared-bus` instance.
pub struct WalletBusAdapter {
    bus: Arc<InMemoryEventBus>,
}

impl WalletBusAdapter {
    /// Wraps an event bus.
    #[must_use]
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        Self { bus }
    }

    /// The underlying bus, for wiring subscribers.
    #[must_use]
    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }
}

#[async_trait]
impl EventSink for WalletBusAdapter {
    async fn queue_updated(&self, snapshot: QueueSnapshot) {
        self.bus.publish(WalletEvent::QueueUpdated(snapshot)).await;
    }

    async fn confirmation_settled(&self, id: &RequestId, kind: ConfirmationKind, approved: bool) {
        self.bus
            .publish(WalletEvent::ConfirmationSettled {
                id: id.clone(),
                kind,
                approved,
            })
            .await;
    }

    async fn wallet_reset(&self, rejected: usize) {
        self.bus.publish(WalletEvent::WalletReset { rejected }).await;
    }

    async fn keyring_locked(&self) {
        self.bus.publish(WalletEvent::KeyringLocked).await;
    }
}

/// No-op sink for wiring without an event bus.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn queue_updated(&self, _snapshot: QueueSnapshot) {}

    async fn confirmation_settled(
        &self,
        _id: &RequestId,
        _kind: ConfirmationKind,
        _approved: bool,
    ) {
    }

    async fn wallet_reset(&self, _rejected: usize) {}

    async fn keyring_locked(&self) {}
}

/// Recording sink for testing.
#[cfg(test)]
pub struct RecordingEventSink {
    snapshots: std::sync::Mutex<Vec<QueueSnapshot>>,
    settlements: std::sync::Mutex<Vec<(RequestId, ConfirmationKind, bool)>>,
    resets: std::sync::Mutex<Vec<usize>>,
    keyring_locks: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl RecordingEventSink {
    pub fn new() -> Self {
        Self {
            snapshots: std::sync::Mutex::new(Vec::new()),
            settlements: std::sync::Mutex::new(Vec::new()),
            resets: std::sync::Mutex::new(Vec::new()),
            keyring_locks: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn snapshots(&self) -> Vec<QueueSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn settlements(&self) -> Vec<(RequestId, ConfirmationKind, bool)> {
        self.settlements.lock().unwrap().clone()
    }

    pub fn resets(&self) -> Vec<usize> {
        self.resets.lock().unwrap().clone()
    }

    pub fn keyring_locks(&self) -> usize {
        self.keyring_locks.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl EventSink for RecordingEventSink {
    async fn queue_updated(&self, snapshot: QueueSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot);
    }

    async fn confirmation_settled(&self, id: &RequestId, kind: ConfirmationKind, approved: bool) {
        self.settlements
            .lock()
            .unwrap()
            .push((id.clone(), kind, approved));
    }

    async fn wallet_reset(&self, rejected: usize) {
        self.resets.lock().unwrap().push(rejected);
    }

    async fn keyring_locked(&self) {
        self.keyring_locks
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}
