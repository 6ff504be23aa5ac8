//! # Integration Test Flows
//!
//! Tests that wd-01-confirmations, shared-bus, and shared-types work
//! together correctly: a requester enqueues through the service (or the IPC
//! handler), the approver surface observes snapshots on the bus and
//! resolves, and the requester's future settles with the decorated result.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    // Shared infrastructure
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, WalletEvent};
    use shared_types::{
        ApproverVerdict, ConfirmationKind, ConfirmationPayload, ConfirmationResult,
        EvmSignMessagePayload, EvmTransactionPayload, Origin, RequestId,
    };

    // Subsystem 1: Confirmations
    use wd_01_confirmations::adapters::bus::WalletBusAdapter;
    use wd_01_confirmations::domain::ConfirmationError;
    use wd_01_confirmations::ipc::{
        CallerSurface, EnqueueConfirmationRequest, IpcHandler, ResolveConfirmationRequest,
    };
    use wd_01_confirmations::ports::inbound::{ConfirmationApi, ConfirmationSubmission};
    use wd_01_confirmations::ports::outbound::SystemTimeSource;
    use wd_01_confirmations::ConfirmationService;

    use crate::integration::support::{
        stub_registry, CountingNotifier, StubKeyringPolicy, StubSigner,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Fixture {
        service: Arc<ConfirmationService<SystemTimeSource>>,
        bus: Arc<InMemoryEventBus>,
        signer: Arc<StubSigner>,
        keyring: Arc<StubKeyringPolicy>,
        notifier: Arc<CountingNotifier>,
    }

    fn fixture(always_unlock: bool) -> Fixture {
        let bus = Arc::new(InMemoryEventBus::new());
        let signer = Arc::new(StubSigner::new());
        let keyring = Arc::new(StubKeyringPolicy::new(always_unlock));
        let notifier = Arc::new(CountingNotifier::new());
        let service = Arc::new(ConfirmationService::new(
            stub_registry(signer.clone()),
            keyring.clone(),
            notifier.clone(),
            Arc::new(WalletBusAdapter::new(bus.clone())),
            SystemTimeSource,
        ));
        Fixture {
            service,
            bus,
            signer,
            keyring,
            notifier,
        }
    }

    fn sign_message(message: &[u8]) -> ConfirmationPayload {
        ConfirmationPayload::EvmSignMessage(EvmSignMessagePayload {
            address: "0xAA".to_string(),
            message: message.to_vec(),
        })
    }

    fn send_transaction(value: &str) -> ConfirmationPayload {
        ConfirmationPayload::EvmSendTransaction(EvmTransactionPayload {
            chain_id: 1,
            from: "0xAA".to_string(),
            to: Some("0xBB".to_string()),
            value: value.to_string(),
            data: vec![],
            nonce: None,
        })
    }

    fn dapp_submission(id: &str, payload: ConfirmationPayload) -> ConfirmationSubmission {
        ConfirmationSubmission::new(
            RequestId::new(id),
            Origin::external("https://dapp.example"),
            payload,
        )
    }

    async fn next_event(sub: &mut shared_bus::Subscription) -> WalletEvent {
        timeout(Duration::from_millis(200), sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("bus closed")
    }

    // =============================================================================
    // INTEGRATION TESTS: REQUESTER → CONTROLLER → APPROVER → BUS
    // =============================================================================

    /// Enqueue a sign-message request, approve it, and receive a non-empty
    /// signature through the requester's future.
    #[tokio::test]
    async fn test_sign_message_round_trip_over_bus() {
        let f = fixture(false);

        // Approver UI subscribes BEFORE the requester acts.
        let mut sub = f
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Confirmations]));

        let pending = f
            .service
            .enqueue(dapp_submission("req-1", sign_message(b"hello")))
            .await
            .expect("enqueue");

        // The queue update carries the rendered request.
        let event = next_event(&mut sub).await;
        match event {
            WalletEvent::QueueUpdated(snapshot) => {
                assert_eq!(snapshot.total, 1);
                let request = snapshot.find(&RequestId::new("req-1")).expect("request");
                assert_eq!(request.kind(), ConfirmationKind::EvmSignMessage);
                assert_eq!(request.origin, Origin::external("https://dapp.example"));
            }
            other => panic!("expected QueueUpdated, got {other:?}"),
        }

        // Approver consents; the decorator invokes the signer.
        f.service
            .resolve(&RequestId::new("req-1"), ApproverVerdict::approve())
            .await
            .expect("resolve");

        let result = pending.wait().await.expect("settled");
        match result {
            ConfirmationResult::MessageSignature { signature } => {
                assert!(!signature.is_empty());
            }
            other => panic!("expected a signature, got {other:?}"),
        }
        assert_eq!(f.signer.call_count(), 1);

        // Empty queue snapshot, then the settlement event.
        let event = next_event(&mut sub).await;
        assert!(matches!(
            event,
            WalletEvent::QueueUpdated(ref snapshot) if snapshot.is_empty()
        ));
        let event = next_event(&mut sub).await;
        match event {
            WalletEvent::ConfirmationSettled { id, approved, .. } => {
                assert_eq!(id, RequestId::new("req-1"));
                assert!(approved);
            }
            other => panic!("expected ConfirmationSettled, got {other:?}"),
        }
    }

    /// Duplicate (kind, origin, payload) is rejected synchronously while the
    /// first request is pending, and admitted again once it settles.
    #[tokio::test]
    async fn test_duplicate_lifecycle() {
        let f = fixture(false);

        let first = f
            .service
            .enqueue(dapp_submission("req-1", sign_message(b"hello")))
            .await
            .expect("first enqueue");

        let err = f
            .service
            .enqueue(dapp_submission("req-2", sign_message(b"hello")))
            .await
            .expect_err("duplicate must be rejected");
        assert!(matches!(err, ConfirmationError::DuplicateRequest { .. }));

        // Nothing was queued for the duplicate.
        assert_eq!(f.service.pending_count().await, 1);

        f.service
            .resolve(&RequestId::new("req-1"), ApproverVerdict::approve())
            .await
            .expect("resolve");
        first.wait().await.expect("settled");

        f.service
            .enqueue(dapp_submission("req-3", sign_message(b"hello")))
            .await
            .expect("identical request after settlement");
    }

    /// A send-transaction whose validator refuses empty hashes rejects the
    /// requester's future, removes the record, and leaves no stale
    /// duplicate behind.
    #[tokio::test]
    async fn test_validator_rejection_frees_the_slot() {
        let f = fixture(false);

        let pending = f
            .service
            .enqueue(
                dapp_submission("req-1", send_transaction("42")).with_validator(|result| {
                    match result {
                        ConfirmationResult::TransactionSubmitted { tx_hash }
                            if tx_hash.is_empty() =>
                        {
                            Err("empty transaction hash".to_string())
                        }
                        _ => Ok(()),
                    }
                }),
            )
            .await
            .expect("enqueue");

        f.service
            .resolve(
                &RequestId::new("req-1"),
                ApproverVerdict::terminal(ConfirmationResult::TransactionSubmitted {
                    tx_hash: String::new(),
                }),
            )
            .await
            .expect("resolve");

        let err = pending.wait().await.expect_err("validator must reject");
        assert!(matches!(err, ConfirmationError::ValidationFailed(_)));
        assert_eq!(f.service.pending_count().await, 0);

        f.service
            .enqueue(dapp_submission("req-2", send_transaction("42")))
            .await
            .expect("fresh identical enqueue succeeds");
    }

    /// Approving a second time for the same id is a hard NotFound, observed
    /// while the keyring policy and signer stay untouched.
    #[tokio::test]
    async fn test_stale_approval_cannot_double_sign() {
        let f = fixture(false);

        let pending = f
            .service
            .enqueue(dapp_submission("req-1", sign_message(b"hello")))
            .await
            .expect("enqueue");
        f.service
            .resolve(&RequestId::new("req-1"), ApproverVerdict::approve())
            .await
            .expect("first resolve");
        pending.wait().await.expect("settled");

        let err = f
            .service
            .resolve(&RequestId::new("req-1"), ApproverVerdict::approve())
            .await
            .expect_err("second resolve must fail");
        assert_eq!(err, ConfirmationError::NotFound(RequestId::new("req-1")));
        assert_eq!(f.signer.call_count(), 1);
    }

    /// Policy gate: with always-unlock set, queueing a signing kind locks
    /// the keyring, and the decorator re-locks after producing the artifact.
    #[tokio::test]
    async fn test_unlock_policy_brackets_the_signature() {
        let f = fixture(true);
        let mut sub = f
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Keyring]));

        let pending = f
            .service
            .enqueue(dapp_submission("req-1", sign_message(b"hello")))
            .await
            .expect("enqueue");
        assert_eq!(f.keyring.lock_count(), 1);
        assert!(matches!(
            next_event(&mut sub).await,
            WalletEvent::KeyringLocked
        ));

        f.service
            .resolve(&RequestId::new("req-1"), ApproverVerdict::approve())
            .await
            .expect("resolve");
        pending.wait().await.expect("settled");

        assert_eq!(f.keyring.lock_count(), 2);
        assert!(matches!(
            next_event(&mut sub).await,
            WalletEvent::KeyringLocked
        ));
    }

    /// External requesters pop the approver surface; internal flows only
    /// move the badge.
    #[tokio::test]
    async fn test_notifier_behavior_by_origin() {
        let f = fixture(false);

        f.service
            .enqueue(ConfirmationSubmission::new(
                RequestId::new("req-internal"),
                Origin::internal(),
                send_transaction("1"),
            ))
            .await
            .expect("internal enqueue");
        assert_eq!(f.notifier.open_count(), 0);

        f.service
            .enqueue(dapp_submission("req-external", sign_message(b"hi")))
            .await
            .expect("external enqueue");
        assert_eq!(f.notifier.open_count(), 1);
        assert_eq!(f.notifier.badge_history(), vec![1, 2]);
    }

    // =============================================================================
    // INTEGRATION TESTS: IPC SURFACE
    // =============================================================================

    /// Full dApp round trip through the IPC handler: surface-derived origin,
    /// approver-only resolve, settled response with the artifact.
    #[tokio::test]
    async fn test_ipc_round_trip() {
        let f = fixture(false);
        let handler = IpcHandler::new(f.service.clone());
        let dapp = CallerSurface::Requester {
            origin: Origin::external("https://dapp.example"),
        };

        let pending = handler
            .handle_enqueue(
                &dapp,
                EnqueueConfirmationRequest {
                    correlation_id: "c-1".to_string(),
                    id: RequestId::new("req-1"),
                    payload: sign_message(b"hello"),
                    extra_options: Default::default(),
                },
            )
            .await
            .expect("enqueue over ipc");

        // A dApp page cannot resolve its own request.
        let err = handler
            .handle_resolve(
                &dapp,
                ResolveConfirmationRequest {
                    correlation_id: "c-2".to_string(),
                    id: RequestId::new("req-1"),
                    verdict: ApproverVerdict::approve(),
                },
            )
            .await
            .expect_err("requester surface must not resolve");
        assert!(matches!(err, ConfirmationError::Unauthorized { .. }));

        let response = handler
            .handle_resolve(
                &CallerSurface::ApproverUi,
                ResolveConfirmationRequest {
                    correlation_id: "c-3".to_string(),
                    id: RequestId::new("req-1"),
                    verdict: ApproverVerdict::approve(),
                },
            )
            .await
            .expect("approver resolve");
        assert!(response.resolved);

        let settled = IpcHandler::<SystemTimeSource>::await_settlement(
            "c-1".to_string(),
            pending,
        )
        .await;
        assert!(matches!(
            settled.result,
            Some(ConfirmationResult::MessageSignature { .. })
        ));
        assert!(settled.error.is_none());
    }
}
