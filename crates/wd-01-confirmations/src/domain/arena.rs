//! # Confirmation Arena
//!
//! The single table behind the confirmation queue: one entry per request
//! id, holding the request record, its oneshot resolver, and the optional
//! response validator. A per-kind index preserves queueing order for
//! snapshot rendering.
//!
//! Holding both halves in one entry makes the old two-table failure mode
//! (request removed, resolver forgotten, caller hangs forever) impossible:
//! `take()` is the only removal primitive and it yields both at once.
//!
//! ## Invariants Enforced
//!
//! - INVARIANT-1: settlement consumes the entry; a second resolve for the
//!   same id finds nothing.
//! - INVARIANT-3: the request and its resolver can never diverge.

use std::collections::{BTreeMap, HashMap};

use tokio::sync::oneshot;

use shared_types::{
    ConfirmationKind, ConfirmationRequest, ConfirmationResult, Origin, QueueSnapshot, RequestId,
};

use super::errors::ConfirmationError;

/// Caller-supplied check run against the approver's result before the
/// requester's future settles. An `Err` rejects the request with
/// [`ConfirmationError::ValidationFailed`].
pub type ResponseValidator = Box<dyn Fn(&ConfirmationResult) -> Result<(), String> + Send + Sync>;

/// What a settled confirmation delivers to its requester.
pub type SettledOutcome = Result<ConfirmationResult, ConfirmationError>;

/// One live entry: request record, resolver, and optional validator.
pub struct PendingEntry {
    record: ConfirmationRequest,
    resolver: oneshot::Sender<SettledOutcome>,
    validator: Option<ResponseValidator>,
}

impl PendingEntry {
    /// Pairs a request with the sending half of its settlement channel.
    pub fn new(
        record: ConfirmationRequest,
        resolver: oneshot::Sender<SettledOutcome>,
        validator: Option<ResponseValidator>,
    ) -> Self {
        Self {
            record,
            resolver,
            validator,
        }
    }

    /// The request record.
    #[must_use]
    pub fn record(&self) -> &ConfirmationRequest {
        &self.record
    }

    /// Runs the caller-supplied validator, if any.
    pub fn validate(&self, result: &ConfirmationResult) -> Result<(), String> {
        match &self.validator {
            Some(validator) => validator(result),
            None => Ok(()),
        }
    }

    /// Settles the requester's future. Consumes the entry; this is the
    /// exactly-once point.
    ///
    /// Returns false if the requester dropped its receiving half.
    pub fn settle(self, outcome: SettledOutcome) -> bool {
        self.resolver.send(outcome).is_ok()
    }
}

/// The requester's handle on an enqueued confirmation.
///
/// Settles exactly once: approval, rejection, or wallet reset. The wait may
/// be unbounded (a human must act); only `reset_all` can cancel it.
#[derive(Debug)]
pub struct PendingConfirmation {
    id: RequestId,
    receiver: oneshot::Receiver<SettledOutcome>,
}

impl PendingConfirmation {
    pub(crate) fn new(id: RequestId, receiver: oneshot::Receiver<SettledOutcome>) -> Self {
        Self { id, receiver }
    }

    /// The id this handle is waiting on.
    #[must_use]
    pub fn id(&self) -> &RequestId {
        &self.id
    }

    /// Suspends until the confirmation settles.
    pub async fn wait(self) -> SettledOutcome {
        match self.receiver.await {
            Ok(outcome) => outcome,
            Err(_) => Err(ConfirmationError::Internal(
                "confirmation channel dropped before settlement".to_string(),
            )),
        }
    }
}

/// The arena: all pending confirmations, indexed by id and by kind.
#[derive(Default)]
pub struct ConfirmationArena {
    /// All entries indexed by request id.
    entries: HashMap<RequestId, PendingEntry>,

    /// Ids grouped by kind, in queueing order.
    by_kind: BTreeMap<ConfirmationKind, Vec<RequestId>>,
}

impl ConfirmationArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pending confirmations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks whether an id is live.
    #[must_use]
    pub fn contains(&self, id: &RequestId) -> bool {
        self.entries.contains_key(id)
    }

    /// Checks for a live request with the same kind, origin, and payload
    /// fingerprint.
    #[must_use]
    pub fn has_duplicate(
        &self,
        kind: ConfirmationKind,
        origin: &Origin,
        fingerprint: &str,
    ) -> bool {
        self.by_kind.get(&kind).is_some_and(|ids| {
            ids.iter().any(|id| {
                self.entries.get(id).is_some_and(|entry| {
                    entry.record.origin == *origin && entry.record.fingerprint == fingerprint
                })
            })
        })
    }

    /// Inserts a new entry.
    ///
    /// # Errors
    /// `Internal` if the id already exists: ids come from a generator that
    /// never repeats, so a collision is a broken contract upstream, not a
    /// caller-facing condition.
    pub fn insert(&mut self, entry: PendingEntry) -> Result<(), ConfirmationError> {
        let id = entry.record.id.clone();
        if self.entries.contains_key(&id) {
            return Err(ConfirmationError::Internal(format!(
                "request id collision: {id}"
            )));
        }
        self.by_kind
            .entry(entry.record.kind())
            .or_default()
            .push(id.clone());
        self.entries.insert(id, entry);
        Ok(())
    }

    /// Removes and returns the entry for an id.
    ///
    /// Both the record and its resolver leave the arena in this one step;
    /// there is no way to remove half an entry.
    pub fn take(&mut self, id: &RequestId) -> Option<PendingEntry> {
        let entry = self.entries.remove(id)?;
        let kind = entry.record.kind();
        if let Some(ids) = self.by_kind.get_mut(&kind) {
            ids.retain(|queued| queued != id);
            if ids.is_empty() {
                self.by_kind.remove(&kind);
            }
        }
        Some(entry)
    }

    /// Removes every entry in one swap, for wallet reset.
    pub fn drain(&mut self) -> Vec<PendingEntry> {
        self.by_kind.clear();
        std::mem::take(&mut self.entries).into_values().collect()
    }

    /// Builds an immutable snapshot for subscribers, grouped by kind in
    /// queueing order.
    #[must_use]
    pub fn snapshot(&self) -> QueueSnapshot {
        let mut by_kind = BTreeMap::new();
        for (kind, ids) in &self.by_kind {
            let requests: Vec<ConfirmationRequest> = ids
                .iter()
                .filter_map(|id| self.entries.get(id))
                .map(|entry| entry.record.clone())
                .collect();
            if !requests.is_empty() {
                by_kind.insert(*kind, requests);
            }
        }
        QueueSnapshot {
            total: self.entries.len(),
            by_kind,
        }
    }
}
