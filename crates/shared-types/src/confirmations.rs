//! Confirmation kind, payload, and result families.
//!
//! Every operation that requires human approval is one variant of
//! [`ConfirmationPayload`]; the variant fixes both the payload shape and the
//! [`ConfirmationResult`] shape it may settle with. Kinds are grouped by
//! chain ecosystem, each ecosystem defining its own small set.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{Origin, RequestId, Timestamp};

/// Chain ecosystems with confirmation support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainEcosystem {
    Evm,
    Substrate,
    Ton,
    Cardano,
}

/// The closed set of operations that require approval.
///
/// | Kind | Ecosystem | Policy-gated |
/// |------|-----------|--------------|
/// | `EvmSignMessage` | EVM | yes |
/// | `EvmSendTransaction` | EVM | yes |
/// | `EvmWatchTransaction` | EVM | no |
/// | `SubstrateSignMessage` | Substrate | yes |
/// | `SubstrateSignTransaction` | Substrate | yes |
/// | `TonSignMessage` | TON | yes |
/// | `TonSendTransaction` | TON | yes |
/// | `CardanoSignData` | Cardano | yes |
/// | `CardanoSignTransaction` | Cardano | yes |
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ConfirmationKind {
    EvmSignMessage,
    EvmSendTransaction,
    EvmWatchTransaction,
    SubstrateSignMessage,
    SubstrateSignTransaction,
    TonSignMessage,
    TonSendTransaction,
    CardanoSignData,
    CardanoSignTransaction,
}

impl ConfirmationKind {
    /// The ecosystem whose signer collaborator handles this kind.
    #[must_use]
    pub fn ecosystem(&self) -> ChainEcosystem {
        match self {
            Self::EvmSignMessage | Self::EvmSendTransaction | Self::EvmWatchTransaction => {
                ChainEcosystem::Evm
            }
            Self::SubstrateSignMessage | Self::SubstrateSignTransaction => {
                ChainEcosystem::Substrate
            }
            Self::TonSignMessage | Self::TonSendTransaction => ChainEcosystem::Ton,
            Self::CardanoSignData | Self::CardanoSignTransaction => ChainEcosystem::Cardano,
        }
    }

    /// True for kinds that move funds or reveal a signature.
    ///
    /// These are the policy-gated kinds: when the always-require-unlock
    /// policy is set, the keyring is locked before they are queued.
    #[must_use]
    pub fn requires_signature(&self) -> bool {
        !matches!(self, Self::EvmWatchTransaction)
    }

    /// Stable name for logs and event topics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EvmSignMessage => "evm.sign_message",
            Self::EvmSendTransaction => "evm.send_transaction",
            Self::EvmWatchTransaction => "evm.watch_transaction",
            Self::SubstrateSignMessage => "substrate.sign_message",
            Self::SubstrateSignTransaction => "substrate.sign_transaction",
            Self::TonSignMessage => "ton.sign_message",
            Self::TonSendTransaction => "ton.send_transaction",
            Self::CardanoSignData => "cardano.sign_data",
            Self::CardanoSignTransaction => "cardano.sign_transaction",
        }
    }
}

impl std::fmt::Display for ConfirmationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Personal message to sign with an EVM account key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmSignMessagePayload {
    /// Signing account address (0x-hex).
    pub address: String,
    /// Raw message bytes presented to the approver.
    pub message: Vec<u8>,
}

/// EVM transaction to sign and broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmTransactionPayload {
    pub chain_id: u64,
    pub from: String,
    pub to: Option<String>,
    /// Decimal wei amount; opaque to the queue.
    pub value: String,
    pub data: Vec<u8>,
    pub nonce: Option<u64>,
}

/// Already-broadcast EVM transaction the requester wants tracked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmWatchPayload {
    pub chain_id: u64,
    pub tx_hash: String,
}

/// Raw bytes to sign with a Substrate account key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstrateSignMessagePayload {
    pub address: String,
    pub data: Vec<u8>,
}

/// Substrate extrinsic signing request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstrateExtrinsicPayload {
    pub address: String,
    pub genesis_hash: String,
    /// SCALE-encoded call; opaque to the queue.
    pub method: Vec<u8>,
    pub nonce: u64,
    pub spec_version: u32,
}

/// Payload to sign with a TON account key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TonSignMessagePayload {
    pub address: String,
    pub payload: Vec<u8>,
}

/// TON transfer to sign and broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TonTransferPayload {
    pub from: String,
    pub to: String,
    /// Decimal nanoton amount; opaque to the queue.
    pub amount: String,
    pub comment: Option<String>,
}

/// Arbitrary data to sign with a Cardano address key (CIP-8 style).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardanoSignDataPayload {
    pub address: String,
    pub payload: Vec<u8>,
}

/// Cardano transaction body awaiting a witness set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardanoTxPayload {
    /// CBOR-encoded transaction body.
    pub cbor: Vec<u8>,
    /// Sign only the witnesses this wallet controls.
    pub partial_sign: bool,
}

/// Union of all kind-specific payloads.
///
/// The variant IS the kind: there is no separate dynamic kind string to keep
/// in sync, and pattern matches over payloads are exhaustive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationPayload {
    EvmSignMessage(EvmSignMessagePayload),
    EvmSendTransaction(EvmTransactionPayload),
    EvmWatchTransaction(EvmWatchPayload),
    SubstrateSignMessage(SubstrateSignMessagePayload),
    SubstrateSignTransaction(SubstrateExtrinsicPayload),
    TonSignMessage(TonSignMessagePayload),
    TonSendTransaction(TonTransferPayload),
    CardanoSignData(CardanoSignDataPayload),
    CardanoSignTransaction(CardanoTxPayload),
}

impl ConfirmationPayload {
    /// Projects the kind tag for this payload.
    #[must_use]
    pub fn kind(&self) -> ConfirmationKind {
        match self {
            Self::EvmSignMessage(_) => ConfirmationKind::EvmSignMessage,
            Self::EvmSendTransaction(_) => ConfirmationKind::EvmSendTransaction,
            Self::EvmWatchTransaction(_) => ConfirmationKind::EvmWatchTransaction,
            Self::SubstrateSignMessage(_) => ConfirmationKind::SubstrateSignMessage,
            Self::SubstrateSignTransaction(_) => ConfirmationKind::SubstrateSignTransaction,
            Self::TonSignMessage(_) => ConfirmationKind::TonSignMessage,
            Self::TonSendTransaction(_) => ConfirmationKind::TonSendTransaction,
            Self::CardanoSignData(_) => ConfirmationKind::CardanoSignData,
            Self::CardanoSignTransaction(_) => ConfirmationKind::CardanoSignTransaction,
        }
    }
}

/// The artifact a settled confirmation delivers back to the requester.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationResult {
    /// Signature over a message or data payload (hex).
    MessageSignature { signature: String },
    /// Fully signed transaction, ready for broadcast (hex).
    SignedTransaction { raw: String },
    /// Transaction accepted by the network.
    TransactionSubmitted { tx_hash: String },
    /// Cardano witness set for the requested body (CBOR hex).
    WitnessSet { cbor: String },
    /// The wallet is now tracking the transaction.
    TransactionWatched { tx_hash: String },
    /// The approver terminated the request without producing an artifact.
    Cancelled { reason: Option<String> },
}

impl ConfirmationResult {
    /// Whether this result shape is legal for the given kind.
    ///
    /// `Cancelled` is a terminal value and matches every kind.
    #[must_use]
    pub fn matches_kind(&self, kind: ConfirmationKind) -> bool {
        match self {
            Self::Cancelled { .. } => true,
            Self::MessageSignature { .. } => matches!(
                kind,
                ConfirmationKind::EvmSignMessage
                    | ConfirmationKind::SubstrateSignMessage
                    | ConfirmationKind::TonSignMessage
                    | ConfirmationKind::CardanoSignData
            ),
            Self::SignedTransaction { .. } => {
                matches!(kind, ConfirmationKind::SubstrateSignTransaction)
            }
            Self::TransactionSubmitted { .. } => matches!(
                kind,
                ConfirmationKind::EvmSendTransaction | ConfirmationKind::TonSendTransaction
            ),
            Self::WitnessSet { .. } => matches!(kind, ConfirmationKind::CardanoSignTransaction),
            Self::TransactionWatched { .. } => {
                matches!(kind, ConfirmationKind::EvmWatchTransaction)
            }
        }
    }
}

/// The approver's answer for one pending confirmation.
///
/// `result: None` means "the user consented, produce the artifact now" (the
/// Result Decorator invokes the signer). A populated result is a terminal
/// value supplied by the approver surface, typically [`ConfirmationResult::Cancelled`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverVerdict {
    pub result: Option<ConfirmationResult>,
}

impl ApproverVerdict {
    /// Consent: decorate the request with a freshly produced artifact.
    #[must_use]
    pub fn approve() -> Self {
        Self { result: None }
    }

    /// Terminal value chosen by the approver.
    #[must_use]
    pub fn terminal(result: ConfirmationResult) -> Self {
        Self {
            result: Some(result),
        }
    }
}

/// One pending operation awaiting approval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub id: RequestId,
    pub origin: Origin,
    pub payload: ConfirmationPayload,
    /// Canonical payload fingerprint, used only for duplicate detection.
    pub fingerprint: String,
    /// Passthrough metadata (UI hints). Never inspected by the queue.
    #[serde(default)]
    pub extra_options: HashMap<String, Value>,
    pub queued_at: Timestamp,
}

impl ConfirmationRequest {
    /// The kind tag of this request's payload.
    #[must_use]
    pub fn kind(&self) -> ConfirmationKind {
        self.payload.kind()
    }

    /// True when the requester is a wallet-internal flow.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.origin.is_internal()
    }
}

/// Immutable view of the pending queue, published to subscribers.
///
/// Requests are grouped by kind and kept in insertion order within a kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub by_kind: BTreeMap<ConfirmationKind, Vec<ConfirmationRequest>>,
    pub total: usize,
}

impl QueueSnapshot {
    /// Requests of one kind, in queueing order.
    #[must_use]
    pub fn of_kind(&self, kind: ConfirmationKind) -> &[ConfirmationRequest] {
        self.by_kind.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Looks a request up by id across all kinds.
    #[must_use]
    pub fn find(&self, id: &RequestId) -> Option<&ConfirmationRequest> {
        self.by_kind
            .values()
            .flat_map(|requests| requests.iter())
            .find(|request| &request.id == id)
    }

    /// True when no requests are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
