//! Canonical payload fingerprint for duplicate detection.
//!
//! Two requests are duplicates when they carry the same kind, origin, and
//! fingerprint. The fingerprint must therefore be independent of the key
//! order a requester happened to send: the payload is rendered through
//! `serde_json::Value`, whose object maps are ordered by key, then hashed.
//! `extra_options` and timestamps are never part of the fingerprint.

use sha2::{Digest, Sha256};
use shared_types::ConfirmationPayload;

/// Computes the canonical fingerprint of a payload.
///
/// # Errors
/// Fails only if the payload cannot be serialized, which indicates a
/// programming error in the payload types rather than bad caller input.
pub fn payload_fingerprint(payload: &ConfirmationPayload) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_value(payload)?.to_string();
    let digest = Sha256::digest(canonical.as_bytes());
    Ok(hex::encode(digest))
}
