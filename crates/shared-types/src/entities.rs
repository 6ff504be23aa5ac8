//! Core identity entities shared across subsystems.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// Sentinel origin for wallet-internal flows (send screens, migrations).
pub const INTERNAL_ORIGIN: &str = "wallet-internal";

/// Globally unique identifier for a confirmation request.
///
/// Generated by the requester-facing API layer and stable for the lifetime
/// of the request. Ids are never reused: a settled id stays settled, so a
/// stale approval can never complete a later request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generates a fresh random id (UUIDv4).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an id produced by an upstream generator.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The requesting origin of a confirmation.
///
/// External origins are dApp page URLs; wallet-internal flows use the
/// [`INTERNAL_ORIGIN`] sentinel and skip the "open approver window" step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Origin(String);

impl Origin {
    /// An external (in-page dApp) origin.
    pub fn external(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The wallet-internal sentinel origin.
    #[must_use]
    pub fn internal() -> Self {
        Self(INTERNAL_ORIGIN.to_string())
    }

    /// Returns true for wallet-internal flows.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.0 == INTERNAL_ORIGIN
    }

    /// Returns the origin as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
