//! Outbound (Driven) ports for the confirmation subsystem.
//!
//! These traits define dependencies on external collaborators: the
//! per-ecosystem signers, the keyring unlock policy, the approver surface
//! notifier, the event sink, and the time source.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use shared_types::{
    ChainEcosystem, ConfirmationKind, ConfirmationPayload, ConfirmationResult, QueueSnapshot,
    RequestId, Timestamp,
};

/// Time source for consistent timestamp handling.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Errors an external signer may report.
///
/// Signers fail loudly; they never return sentinel values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    /// The keyring is locked; the approver must authenticate first.
    #[error("keyring is locked")]
    KeyringLocked,

    /// The signer rejected the payload.
    #[error("signer rejected the payload: {0}")]
    InvalidPayload(String),

    /// The signing backend failed.
    #[error("signing backend failure: {0}")]
    Backend(String),
}

/// External signer for one chain ecosystem.
///
/// Invoked by the Result Decorator only after the approver consented, with
/// the request's original payload. This is the sole path that touches key
/// material.
#[async_trait]
pub trait ChainSigner: Send + Sync {
    /// Produces the cryptographic result for an approved payload.
    async fn sign(
        &self,
        payload: &ConfirmationPayload,
    ) -> Result<ConfirmationResult, SignerError>;
}

/// One signer collaborator per chain ecosystem.
pub struct SignerRegistry {
    evm: Arc<dyn ChainSigner>,
    substrate: Arc<dyn ChainSigner>,
    ton: Arc<dyn ChainSigner>,
    cardano: Arc<dyn ChainSigner>,
}

impl SignerRegistry {
    /// Wires the four ecosystem signers.
    #[must_use]
    pub fn new(
        evm: Arc<dyn ChainSigner>,
        substrate: Arc<dyn ChainSigner>,
        ton: Arc<dyn ChainSigner>,
        cardano: Arc<dyn ChainSigner>,
    ) -> Self {
        Self {
            evm,
            substrate,
            ton,
            cardano,
        }
    }

    /// The signer responsible for an ecosystem.
    #[must_use]
    pub fn for_ecosystem(&self, ecosystem: ChainEcosystem) -> &Arc<dyn ChainSigner> {
        match ecosystem {
            ChainEcosystem::Evm => &self.evm,
            ChainEcosystem::Substrate => &self.substrate,
            ChainEcosystem::Ton => &self.ton,
            ChainEcosystem::Cardano => &self.cardano,
        }
    }
}

/// Keyring unlock policy collaborator.
pub trait KeyringPolicy: Send + Sync {
    /// Whether every signature-producing operation requires a fresh unlock.
    fn is_always_unlock_required(&self) -> bool;

    /// Forces the keyring into the locked state.
    fn lock(&self);
}

/// Approver surface notifier collaborator.
pub trait ApproverNotifier: Send + Sync {
    /// Opens the approval popup/window for an external requester.
    fn open_approver_surface(&self);

    /// Updates the pending-request badge. A count of zero tells the
    /// notifier the surface may close.
    fn update_badge(&self, pending: usize);
}

/// Event sink the controller publishes through after every mutation.
///
/// Implementations connect to the actual event bus (shared-bus).
#[async_trait]
pub trait EventSink: Send + Sync {
    /// The queue changed; here is the new snapshot.
    async fn queue_updated(&self, snapshot: QueueSnapshot);

    /// One confirmation settled.
    async fn confirmation_settled(&self, id: &RequestId, kind: ConfirmationKind, approved: bool);

    /// A wallet reset rejected every pending request.
    async fn wallet_reset(&self, rejected: usize);

    /// The unlock policy forced the keyring into the locked state.
    async fn keyring_locked(&self);
}

/// Mock time source for testing.
#[cfg(test)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Mock signer producing canned artifacts, for testing.
#[cfg(test)]
pub struct MockChainSigner {
    pub fail_with: std::sync::Mutex<Option<SignerError>>,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockChainSigner {
    pub fn new() -> Self {
        Self {
            fail_with: std::sync::Mutex::new(None),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn failing(error: SignerError) -> Self {
        Self {
            fail_with: std::sync::Mutex::new(Some(error)),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl ChainSigner for MockChainSigner {
    async fn sign(
        &self,
        payload: &ConfirmationPayload,
    ) -> Result<ConfirmationResult, SignerError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(error) = self.fail_with.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(match payload {
            ConfirmationPayload::EvmSignMessage(_)
            | ConfirmationPayload::SubstrateSignMessage(_)
            | ConfirmationPayload::TonSignMessage(_)
            | ConfirmationPayload::CardanoSignData(_) => ConfirmationResult::MessageSignature {
                signature: "0xmock-signature".to_string(),
            },
            ConfirmationPayload::SubstrateSignTransaction(_) => {
                ConfirmationResult::SignedTransaction {
                    raw: "0xmock-extrinsic".to_string(),
                }
            }
            ConfirmationPayload::EvmSendTransaction(_)
            | ConfirmationPayload::TonSendTransaction(_) => {
                ConfirmationResult::TransactionSubmitted {
                    tx_hash: "0xmock-tx-hash".to_string(),
                }
            }
            ConfirmationPayload::CardanoSignTransaction(_) => ConfirmationResult::WitnessSet {
                cbor: "mock-witness-set".to_string(),
            },
            ConfirmationPayload::EvmWatchTransaction(watch) => {
                ConfirmationResult::TransactionWatched {
                    tx_hash: watch.tx_hash.clone(),
                }
            }
        })
    }
}

/// Mock keyring policy for testing.
#[cfg(test)]
pub struct MockKeyringPolicy {
    pub always_unlock: std::sync::atomic::AtomicBool,
    pub lock_calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockKeyringPolicy {
    pub fn new(always_unlock: bool) -> Self {
        Self {
            always_unlock: std::sync::atomic::AtomicBool::new(always_unlock),
            lock_calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn lock_count(&self) -> usize {
        self.lock_calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl KeyringPolicy for MockKeyringPolicy {
    fn is_always_unlock_required(&self) -> bool {
        self.always_unlock.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn lock(&self) {
        self.lock_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

/// Recording notifier for testing.
#[cfg(test)]
pub struct RecordingNotifier {
    pub opens: std::sync::atomic::AtomicUsize,
    pub badges: std::sync::Mutex<Vec<usize>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            opens: std::sync::atomic::AtomicUsize::new(0),
            badges: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn last_badge(&self) -> Option<usize> {
        self.badges.lock().unwrap().last().copied()
    }
}

#[cfg(test)]
impl ApproverNotifier for RecordingNotifier {
    fn open_approver_surface(&self) {
        self.opens
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn update_badge(&self, pending: usize) {
        self.badges.lock().unwrap().push(pending);
    }
}
