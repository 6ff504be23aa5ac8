//! Core domain entities for the confirmation subsystem.

// Re-export from shared-types for convenience
pub use shared_types::{
    ApproverVerdict, ChainEcosystem, ConfirmationKind, ConfirmationPayload, ConfirmationRequest,
    ConfirmationResult, Origin, QueueSnapshot, RequestId, Timestamp,
};

/// Configuration for the confirmation subsystem.
#[derive(Clone, Debug)]
pub struct ConfirmationConfig {
    /// Maximum settled ids remembered for stale-resolve diagnostics.
    pub settled_cache_capacity: usize,
    /// How long a settled id is remembered, in milliseconds.
    pub settled_cache_ttl_ms: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            settled_cache_capacity: 1024,
            settled_cache_ttl_ms: 10 * 60 * 1000,
        }
    }
}
