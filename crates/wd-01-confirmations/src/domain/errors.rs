//! Confirmation error types.
//!
//! Every controller operation returns these explicitly; duplicates and
//! stale ids are values to handle, not exceptions to catch.

use shared_types::{ConfirmationKind, RequestId};
use thiserror::Error;

/// Confirmation subsystem error type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfirmationError {
    /// A request with the same kind, origin, and payload fingerprint is
    /// already pending. Returned synchronously from `enqueue`; nothing is
    /// queued. Recoverable: the requester may retry once the first settles.
    #[error("a request with the same payload from {origin} is already awaiting approval")]
    DuplicateRequest {
        kind: ConfirmationKind,
        origin: String,
    },

    /// No pending confirmation with this id. Protocol violation by the
    /// caller (stale approver surface); surfaced and logged, never ignored.
    #[error("no pending confirmation with id {0}")]
    NotFound(RequestId),

    /// The approver's result failed the caller-supplied validator, or its
    /// shape does not match the request's kind.
    #[error("the provided response was invalid: {0}")]
    ValidationFailed(String),

    /// The wallet was locked or restored while the request was pending.
    /// Expected during reset; every outstanding future receives it.
    #[error("the wallet session was reset")]
    WalletReset,

    /// The external signer failed while producing the result. The request
    /// is still removed; a failed signing attempt never leaves it stuck.
    #[error("signer failure: {0}")]
    SignerFailure(String),

    /// The caller surface is not allowed to perform this operation.
    #[error("{surface} is not authorized to {operation}")]
    Unauthorized { surface: String, operation: String },

    /// Internal contract violation (id collision, dropped channel).
    #[error("internal error: {0}")]
    Internal(String),
}
