//! Ports: the inbound API surface and the outbound collaborator traits.

pub mod inbound;
pub mod outbound;

pub use inbound::{ConfirmationApi, ConfirmationSubmission};
pub use outbound::{
    ApproverNotifier, ChainSigner, EventSink, KeyringPolicy, SignerError, SignerRegistry,
    SystemTimeSource, TimeSource,
};
