//! IPC message payloads for the confirmation subsystem.
//!
//! Each request carries a correlation id so the RPC glue can pair responses
//! with in-flight calls across the process boundary.
//!
//! Payloads carry no origin field: the recorded origin comes from the
//! caller surface, which the transport authenticates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_types::{
    ApproverVerdict, ConfirmationPayload, ConfirmationResult, QueueSnapshot, RequestId,
};

/// Queue a new confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueConfirmationRequest {
    pub correlation_id: String,
    pub id: RequestId,
    pub payload: ConfirmationPayload,
    #[serde(default)]
    pub extra_options: HashMap<String, Value>,
}

/// Final answer for an enqueued confirmation, sent when it settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationSettledResponse {
    pub correlation_id: String,
    pub id: RequestId,
    /// The artifact, when the request resolved.
    pub result: Option<ConfirmationResult>,
    /// The rejection message, when it did not.
    pub error: Option<String>,
}

/// Settle one pending confirmation (approver surface only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfirmationRequest {
    pub correlation_id: String,
    pub id: RequestId,
    #[serde(default)]
    pub verdict: ApproverVerdict,
}

/// Outcome of a resolve call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfirmationResponse {
    pub correlation_id: String,
    pub resolved: bool,
    pub error: Option<String>,
}

/// Reject everything pending (wallet reset flow only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetConfirmationsRequest {
    pub correlation_id: String,
}

/// Outcome of a reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetConfirmationsResponse {
    pub correlation_id: String,
    pub rejected: usize,
}

/// Read the current queue snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshotRequest {
    pub correlation_id: String,
}

/// Current queue snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshotResponse {
    pub correlation_id: String,
    pub snapshot: QueueSnapshot,
}
