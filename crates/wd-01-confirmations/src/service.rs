//! # Confirmation Service
//!
//! Application service layer that implements the `ConfirmationApi` trait.
//! This is the Lifecycle Controller: the only component requesters, the
//! approver UI, and the reset flow interact with directly.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`ConfirmationApi`)
//! - Uses the outbound ports (`SignerRegistry`, `KeyringPolicy`,
//!   `ApproverNotifier`, `EventSink`, `TimeSource`)
//! - Delegates queue bookkeeping to the domain layer (`ConfirmationArena`)
//!
//! ## Serialization
//!
//! One async mutex over the arena serializes `enqueue`, `resolve`, and
//! `reset_all`. The mutex is held across the Result Decorator's signer
//! await, so a concurrent resolve for the same id queues behind the first
//! and then fails `NotFound`. No interleaving can observe a half-settled
//! record or produce a second signature.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, error, info, warn};

use shared_types::{
    ApproverVerdict, ConfirmationPayload, ConfirmationRequest, ConfirmationResult, QueueSnapshot,
    RequestId,
};

use crate::domain::arena::SettledOutcome;
use crate::domain::fingerprint::payload_fingerprint;
use crate::domain::{
    ConfirmationArena, ConfirmationConfig, ConfirmationError, PendingConfirmation, PendingEntry,
    SettledIdCache,
};
use crate::ports::inbound::{ConfirmationApi, ConfirmationSubmission};
use crate::ports::outbound::{
    ApproverNotifier, EventSink, KeyringPolicy, SignerRegistry, TimeSource,
};

/// Confirmation Service.
///
/// Owns the canonical queue state; everything else observes it through
/// snapshots. See the crate docs for the invariant table.
pub struct ConfirmationService<T: TimeSource> {
    config: ConfirmationConfig,
    arena: Mutex<ConfirmationArena>,
    settled: std::sync::Mutex<SettledIdCache>,
    signers: SignerRegistry,
    keyring: Arc<dyn KeyringPolicy>,
    notifier: Arc<dyn ApproverNotifier>,
    sink: Arc<dyn EventSink>,
    time: T,
}

impl<T: TimeSource> ConfirmationService<T> {
    /// Creates a service with default configuration.
    pub fn new(
        signers: SignerRegistry,
        keyring: Arc<dyn KeyringPolicy>,
        notifier: Arc<dyn ApproverNotifier>,
        sink: Arc<dyn EventSink>,
        time: T,
    ) -> Self {
        Self::with_config(
            ConfirmationConfig::default(),
            signers,
            keyring,
            notifier,
            sink,
            time,
        )
    }

    /// Creates a service with explicit configuration.
    pub fn with_config(
        config: ConfirmationConfig,
        signers: SignerRegistry,
        keyring: Arc<dyn KeyringPolicy>,
        notifier: Arc<dyn ApproverNotifier>,
        sink: Arc<dyn EventSink>,
        time: T,
    ) -> Self {
        let settled = SettledIdCache::new(
            config.settled_cache_capacity,
            config.settled_cache_ttl_ms,
        );
        Self {
            config,
            arena: Mutex::new(ConfirmationArena::new()),
            settled: std::sync::Mutex::new(settled),
            signers,
            keyring,
            notifier,
            sink,
            time,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ConfirmationConfig {
        &self.config
    }

    /// Forces the keyring locked and publishes the lock event.
    async fn lock_keyring(&self) {
        self.keyring.lock();
        self.sink.keyring_locked().await;
    }

    /// The Result Decorator: produces the artifact for an approved request.
    ///
    /// Watch requests are acknowledged from their own payload; every other
    /// kind routes to the signer for its ecosystem. When the unlock policy
    /// is set, the keyring is re-locked after the attempt whether or not it
    /// succeeded: a single unlock never authorizes a second operation.
    async fn decorate(&self, record: &ConfirmationRequest) -> SettledOutcome {
        if let ConfirmationPayload::EvmWatchTransaction(watch) = &record.payload {
            return Ok(ConfirmationResult::TransactionWatched {
                tx_hash: watch.tx_hash.clone(),
            });
        }

        let kind = record.kind();
        let signer = self.signers.for_ecosystem(kind.ecosystem());
        let signed = signer.sign(&record.payload).await;
        if self.keyring.is_always_unlock_required() {
            self.lock_keyring().await;
        }
        signed.map_err(|e| ConfirmationError::SignerFailure(e.to_string()))
    }

    /// Decorates the request if needed, then checks result shape and the
    /// caller-supplied validator. Any error here becomes the requester's
    /// rejection; the record is removed either way.
    async fn settle_outcome(
        &self,
        entry: &PendingEntry,
        verdict: ApproverVerdict,
    ) -> SettledOutcome {
        let record = entry.record();
        let kind = record.kind();

        let result = match verdict.result {
            Some(result) => result,
            None => self.decorate(record).await?,
        };

        if !result.matches_kind(kind) {
            return Err(ConfirmationError::ValidationFailed(format!(
                "result shape does not match {kind}"
            )));
        }
        entry
            .validate(&result)
            .map_err(ConfirmationError::ValidationFailed)?;
        Ok(result)
    }

    fn remember_settled(&self, id: RequestId) {
        if let Ok(mut settled) = self.settled.lock() {
            settled.record(id, self.time.now());
        }
    }

    fn was_recently_settled(&self, id: &RequestId) -> bool {
        self.settled
            .lock()
            .map(|settled| settled.contains(id))
            .unwrap_or(false)
    }
}

#[async_trait]
impl<T: TimeSource> ConfirmationApi for ConfirmationService<T> {
    async fn enqueue(
        &self,
        submission: ConfirmationSubmission,
    ) -> Result<PendingConfirmation, ConfirmationError> {
        let ConfirmationSubmission {
            id,
            origin,
            payload,
            extra_options,
            validator,
        } = submission;

        let kind = payload.kind();
        let fingerprint = payload_fingerprint(&payload)
            .map_err(|e| ConfirmationError::Internal(format!("fingerprint serialization: {e}")))?;

        let mut arena = self.arena.lock().await;

        if arena.has_duplicate(kind, &origin, &fingerprint) {
            warn!(%kind, %origin, "Duplicate confirmation rejected before queueing");
            return Err(ConfirmationError::DuplicateRequest {
                kind,
                origin: origin.to_string(),
            });
        }

        if kind.requires_signature() && self.keyring.is_always_unlock_required() {
            // The approver must re-authenticate before this operation signs.
            self.lock_keyring().await;
        }

        let record = ConfirmationRequest {
            id: id.clone(),
            origin,
            payload,
            fingerprint,
            extra_options,
            queued_at: self.time.now(),
        };
        let is_internal = record.is_internal();

        let (sender, receiver) = oneshot::channel();
        arena.insert(PendingEntry::new(record, sender, validator))?;

        let snapshot = arena.snapshot();
        drop(arena);

        self.sink.queue_updated(snapshot.clone()).await;
        if !is_internal {
            self.notifier.open_approver_surface();
        }
        self.notifier.update_badge(snapshot.total);

        info!(%id, %kind, pending = snapshot.total, "Confirmation queued");
        Ok(PendingConfirmation::new(id, receiver))
    }

    async fn resolve(
        &self,
        id: &RequestId,
        verdict: ApproverVerdict,
    ) -> Result<(), ConfirmationError> {
        let mut arena = self.arena.lock().await;

        let Some(entry) = arena.take(id) else {
            drop(arena);
            if self.was_recently_settled(id) {
                error!(%id, "Resolve referenced an already-settled confirmation");
            } else {
                error!(%id, "Resolve referenced an unknown confirmation id");
            }
            return Err(ConfirmationError::NotFound(id.clone()));
        };

        let kind = entry.record().kind();
        let outcome = self.settle_outcome(&entry, verdict).await;
        let approved = outcome.is_ok();
        if !entry.settle(outcome) {
            debug!(%id, "Requester dropped before settlement was delivered");
        }
        self.remember_settled(id.clone());

        let snapshot = arena.snapshot();
        drop(arena);

        self.sink.queue_updated(snapshot.clone()).await;
        self.sink.confirmation_settled(id, kind, approved).await;
        self.notifier.update_badge(snapshot.total);

        info!(%id, %kind, approved, pending = snapshot.total, "Confirmation settled");
        Ok(())
    }

    async fn reset_all(&self) -> usize {
        let mut arena = self.arena.lock().await;
        let entries = arena.drain();
        let rejected = entries.len();

        for entry in entries {
            let id = entry.record().id.clone();
            self.remember_settled(id);
            entry.settle(Err(ConfirmationError::WalletReset));
        }

        let snapshot = arena.snapshot();
        drop(arena);

        self.sink.queue_updated(snapshot).await;
        self.sink.wallet_reset(rejected).await;
        self.notifier.update_badge(0);

        info!(rejected, "Wallet reset rejected all pending confirmations");
        rejected
    }

    async fn pending_count(&self) -> usize {
        self.arena.lock().await.len()
    }

    async fn queue_snapshot(&self) -> QueueSnapshot {
        self.arena.lock().await.snapshot()
    }
}
