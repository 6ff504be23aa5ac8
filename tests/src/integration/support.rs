//! Shared mock collaborators for integration flows.
//!
//! These stand in for the external signer, keyring policy, and approver
//! shell, which live outside this workspace.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use shared_types::{ConfirmationPayload, ConfirmationResult};
use wd_01_confirmations::ports::outbound::{
    ApproverNotifier, ChainSigner, KeyringPolicy, SignerError, SignerRegistry,
};

/// Signer producing deterministic artifacts per payload kind.
pub struct StubSigner {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl StubSigner {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StubSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainSigner for StubSigner {
    async fn sign(
        &self,
        payload: &ConfirmationPayload,
    ) -> Result<ConfirmationResult, SignerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(SignerError::KeyringLocked);
        }
        Ok(match payload {
            ConfirmationPayload::EvmSignMessage(_)
            | ConfirmationPayload::SubstrateSignMessage(_)
            | ConfirmationPayload::TonSignMessage(_)
            | ConfirmationPayload::CardanoSignData(_) => ConfirmationResult::MessageSignature {
                signature: "0xdeadbeef".to_string(),
            },
            ConfirmationPayload::SubstrateSignTransaction(_) => {
                ConfirmationResult::SignedTransaction {
                    raw: "0xsigned-extrinsic".to_string(),
                }
            }
            ConfirmationPayload::EvmSendTransaction(_)
            | ConfirmationPayload::TonSendTransaction(_) => {
                ConfirmationResult::TransactionSubmitted {
                    tx_hash: "0xsubmitted".to_string(),
                }
            }
            ConfirmationPayload::CardanoSignTransaction(_) => ConfirmationResult::WitnessSet {
                cbor: "a0".to_string(),
            },
            ConfirmationPayload::EvmWatchTransaction(watch) => {
                ConfirmationResult::TransactionWatched {
                    tx_hash: watch.tx_hash.clone(),
                }
            }
        })
    }
}

/// Registry wiring the same stub signer to every ecosystem.
pub fn stub_registry(signer: Arc<StubSigner>) -> SignerRegistry {
    SignerRegistry::new(signer.clone(), signer.clone(), signer.clone(), signer)
}

/// Keyring policy with a fixed always-unlock answer and a lock counter.
pub struct StubKeyringPolicy {
    pub always_unlock: bool,
    pub lock_calls: AtomicUsize,
}

impl StubKeyringPolicy {
    pub fn new(always_unlock: bool) -> Self {
        Self {
            always_unlock,
            lock_calls: AtomicUsize::new(0),
        }
    }

    pub fn lock_count(&self) -> usize {
        self.lock_calls.load(Ordering::SeqCst)
    }
}

impl KeyringPolicy for StubKeyringPolicy {
    fn is_always_unlock_required(&self) -> bool {
        self.always_unlock
    }

    fn lock(&self) {
        self.lock_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Notifier recording popup opens and every badge value.
pub struct CountingNotifier {
    pub opens: AtomicUsize,
    pub badges: Mutex<Vec<usize>>,
}

impl CountingNotifier {
    pub fn new() -> Self {
        Self {
            opens: AtomicUsize::new(0),
            badges: Mutex::new(Vec::new()),
        }
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn badge_history(&self) -> Vec<usize> {
        self.badges.lock().unwrap().clone()
    }
}

impl Default for CountingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ApproverNotifier for CountingNotifier {
    fn open_approver_surface(&self) {
        self.opens.fetch_add(1, Ordering::SeqCst);
    }

    fn update_badge(&self, pending: usize) {
        self.badges.lock().unwrap().push(pending);
    }
}
