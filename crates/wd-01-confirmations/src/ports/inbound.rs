//! # Inbound Port - ConfirmationApi
//!
//! Primary driving port exposing the confirmation queue API.
//!
//! ## Callers
//!
//! | Method | Caller |
//! |--------|--------|
//! | `enqueue` | Requester RPC layer, internal wallet flows |
//! | `resolve` | Approver UI surface |
//! | `reset_all` | Wallet lock / restore flow |
//! | `pending_count`, `queue_snapshot` | Approver UI surface |

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use shared_types::{
    ApproverVerdict, ConfirmationPayload, ConfirmationResult, Origin, QueueSnapshot, RequestId,
};

use crate::domain::{ConfirmationError, PendingConfirmation, ResponseValidator};

/// Primary API for the confirmation subsystem.
///
/// # Example
///
/// ```rust,ignore
/// use wd_01_confirmations::ports::{ConfirmationApi, ConfirmationSubmission};
///
/// async fn example(api: &impl ConfirmationApi) {
///     let submission = ConfirmationSubmission::new(id, origin, payload);
///     let pending = api.enqueue(submission).await?;
///     // Suspends until the approver acts or the wallet resets.
///     let result = pending.wait().await?;
/// }
/// ```
#[async_trait]
pub trait ConfirmationApi: Send + Sync {
    /// Queues an operation for approval and returns the requester's handle.
    ///
    /// # Errors
    /// - `DuplicateRequest`: a request with the same kind, origin, and
    ///   payload fingerprint is still pending. Nothing is queued.
    /// - `Internal`: the id generator contract was violated upstream.
    async fn enqueue(
        &self,
        submission: ConfirmationSubmission,
    ) -> Result<PendingConfirmation, ConfirmationError>;

    /// Settles one pending confirmation with the approver's verdict.
    ///
    /// An unset verdict result invokes the external signer for the
    /// request's ecosystem; a populated one is taken as the terminal value.
    /// The record is removed whether the requester's future resolves or
    /// rejects.
    ///
    /// # Errors
    /// - `NotFound`: no live request with this id. Protocol violation by a
    ///   stale approver surface; logged, never silently ignored.
    async fn resolve(
        &self,
        id: &RequestId,
        verdict: ApproverVerdict,
    ) -> Result<(), ConfirmationError>;

    /// Rejects every outstanding request with `WalletReset` and clears the
    /// queue. Runs no signer and no validator. Returns the number of
    /// futures rejected.
    async fn reset_all(&self) -> usize;

    /// Number of requests awaiting approval.
    async fn pending_count(&self) -> usize;

    /// Current queue snapshot, for an approver surface rendering its
    /// initial state before events start flowing.
    async fn queue_snapshot(&self) -> QueueSnapshot;
}

/// One enqueue call's worth of input.
pub struct ConfirmationSubmission {
    pub id: RequestId,
    pub origin: Origin,
    pub payload: ConfirmationPayload,
    pub extra_options: HashMap<String, Value>,
    pub validator: Option<ResponseValidator>,
}

impl ConfirmationSubmission {
    /// A submission with no extra options and no validator.
    #[must_use]
    pub fn new(id: RequestId, origin: Origin, payload: ConfirmationPayload) -> Self {
        Self {
            id,
            origin,
            payload,
            extra_options: HashMap::new(),
            validator: None,
        }
    }

    /// Attaches a response validator.
    #[must_use]
    pub fn with_validator(
        mut self,
        validator: impl Fn(&ConfirmationResult) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Attaches passthrough metadata for the approver UI.
    #[must_use]
    pub fn with_extra_options(mut self, extra_options: HashMap<String, Value>) -> Self {
        self.extra_options = extra_options;
        self
    }
}
