//! IPC message handler for the confirmation subsystem.
//!
//! Validates the caller surface, then maps payloads onto the service. The
//! enqueue handler returns the pending handle; the RPC glue awaits it and
//! ships a [`ConfirmationSettledResponse`] when the request settles.

use std::sync::Arc;

use crate::domain::{ConfirmationError, PendingConfirmation};
use crate::ipc::payloads::*;
use crate::ipc::security::{AuthorizationRules, CallerSurface};
use crate::ports::inbound::{ConfirmationApi, ConfirmationSubmission};
use crate::ports::outbound::TimeSource;
use crate::service::ConfirmationService;

/// IPC message handler for the confirmation queue.
pub struct IpcHandler<T: TimeSource> {
    service: Arc<ConfirmationService<T>>,
}

impl<T: TimeSource> IpcHandler<T> {
    /// Creates a new IPC handler.
    pub fn new(service: Arc<ConfirmationService<T>>) -> Self {
        Self { service }
    }

    /// Returns the underlying service.
    pub fn service(&self) -> &Arc<ConfirmationService<T>> {
        &self.service
    }

    /// Handles EnqueueConfirmationRequest.
    ///
    /// # Security
    /// - Requester and wallet-internal surfaces only
    /// - The recorded origin comes from the surface, never the payload
    pub async fn handle_enqueue(
        &self,
        surface: &CallerSurface,
        request: EnqueueConfirmationRequest,
    ) -> Result<PendingConfirmation, ConfirmationError> {
        AuthorizationRules::validate_enqueue(surface)?;

        let submission = ConfirmationSubmission::new(request.id, surface.origin(), request.payload)
            .with_extra_options(request.extra_options);
        self.service.enqueue(submission).await
    }

    /// Builds the settled response for an awaited enqueue.
    pub async fn await_settlement(
        correlation_id: String,
        pending: PendingConfirmation,
    ) -> ConfirmationSettledResponse {
        let id = pending.id().clone();
        match pending.wait().await {
            Ok(result) => ConfirmationSettledResponse {
                correlation_id,
                id,
                result: Some(result),
                error: None,
            },
            Err(e) => ConfirmationSettledResponse {
                correlation_id,
                id,
                result: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Handles ResolveConfirmationRequest.
    ///
    /// # Security
    /// - Approver surface only
    pub async fn handle_resolve(
        &self,
        surface: &CallerSurface,
        request: ResolveConfirmationRequest,
    ) -> Result<ResolveConfirmationResponse, ConfirmationError> {
        AuthorizationRules::validate_resolve(surface)?;

        match self.service.resolve(&request.id, request.verdict).await {
            Ok(()) => Ok(ResolveConfirmationResponse {
                correlation_id: request.correlation_id,
                resolved: true,
                error: None,
            }),
            Err(e) => Ok(ResolveConfirmationResponse {
                correlation_id: request.correlation_id,
                resolved: false,
                error: Some(e.to_string()),
            }),
        }
    }

    /// Handles ResetConfirmationsRequest.
    ///
    /// # Security
    /// - Wallet-internal surface only
    pub async fn handle_reset(
        &self,
        surface: &CallerSurface,
        request: ResetConfirmationsRequest,
    ) -> Result<ResetConfirmationsResponse, ConfirmationError> {
        AuthorizationRules::validate_reset(surface)?;

        let rejected = self.service.reset_all().await;
        Ok(ResetConfirmationsResponse {
            correlation_id: request.correlation_id,
            rejected,
        })
    }

    /// Handles QueueSnapshotRequest.
    ///
    /// # Security
    /// - Approver surface and wallet-internal only
    pub async fn handle_queue_snapshot(
        &self,
        surface: &CallerSurface,
        request: QueueSnapshotRequest,
    ) -> Result<QueueSnapshotResponse, ConfirmationError> {
        AuthorizationRules::validate_queue_read(surface)?;

        Ok(QueueSnapshotResponse {
            correlation_id: request.correlation_id,
            snapshot: self.service.queue_snapshot().await,
        })
    }
}
