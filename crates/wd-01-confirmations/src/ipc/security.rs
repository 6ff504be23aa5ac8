//! Caller-surface authorization for IPC messages.
//!
//! Identity is derived solely from the authenticated caller surface; a
//! payload can never claim a different origin than the channel it arrived
//! on.
//!
//! ## Authorization Matrix
//!
//! | Operation | Authorized Surface(s) |
//! |-----------|----------------------|
//! | `enqueue` | Requester, WalletInternal |
//! | `resolve` | ApproverUi |
//! | `reset_all` | WalletInternal |
//! | queue reads | ApproverUi, WalletInternal |

use shared_types::Origin;

use crate::domain::ConfirmationError;

/// The execution context a message arrived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerSurface {
    /// An in-page dApp, identified by the origin the transport verified.
    Requester { origin: Origin },
    /// The approval popup/window.
    ApproverUi,
    /// A wallet-internal flow (send screen, lock/restore).
    WalletInternal,
}

impl CallerSurface {
    /// The origin to record on requests from this surface.
    #[must_use]
    pub fn origin(&self) -> Origin {
        match self {
            Self::Requester { origin } => origin.clone(),
            Self::ApproverUi | Self::WalletInternal => Origin::internal(),
        }
    }

    /// Surface name for error messages and logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Requester { .. } => "requester",
            Self::ApproverUi => "approver-ui",
            Self::WalletInternal => "wallet-internal",
        }
    }
}

/// Static authorization rules, one validator per operation.
pub struct AuthorizationRules;

impl AuthorizationRules {
    /// Requesters and internal flows may queue confirmations.
    pub fn validate_enqueue(surface: &CallerSurface) -> Result<(), ConfirmationError> {
        match surface {
            CallerSurface::Requester { .. } | CallerSurface::WalletInternal => Ok(()),
            CallerSurface::ApproverUi => Err(Self::unauthorized(surface, "enqueue")),
        }
    }

    /// Only the approver surface may settle a confirmation.
    pub fn validate_resolve(surface: &CallerSurface) -> Result<(), ConfirmationError> {
        match surface {
            CallerSurface::ApproverUi => Ok(()),
            _ => Err(Self::unauthorized(surface, "resolve")),
        }
    }

    /// Only wallet-internal flows may reset the queue.
    pub fn validate_reset(surface: &CallerSurface) -> Result<(), ConfirmationError> {
        match surface {
            CallerSurface::WalletInternal => Ok(()),
            _ => Err(Self::unauthorized(surface, "reset confirmations")),
        }
    }

    /// The approver surface and internal flows may read the queue.
    pub fn validate_queue_read(surface: &CallerSurface) -> Result<(), ConfirmationError> {
        match surface {
            CallerSurface::ApproverUi | CallerSurface::WalletInternal => Ok(()),
            CallerSurface::Requester { .. } => Err(Self::unauthorized(surface, "read the queue")),
        }
    }

    fn unauthorized(surface: &CallerSurface, operation: &str) -> ConfirmationError {
        ConfirmationError::Unauthorized {
            surface: surface.name().to_string(),
            operation: operation.to_string(),
        }
    }
}
