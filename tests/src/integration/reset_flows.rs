//! # Wallet Reset Flows
//!
//! Tests that `reset_all` settles every outstanding requester, clears the
//! queue atomically, and notifies observers, with no signing and no
//! validator involvement on the reset path.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, WalletEvent};
    use shared_types::{
        ApproverVerdict, CardanoTxPayload, ConfirmationPayload, EvmSignMessagePayload, Origin,
        RequestId, TonTransferPayload,
    };

    use wd_01_confirmations::adapters::bus::WalletBusAdapter;
    use wd_01_confirmations::domain::ConfirmationError;
    use wd_01_confirmations::ports::inbound::{ConfirmationApi, ConfirmationSubmission};
    use wd_01_confirmations::ports::outbound::SystemTimeSource;
    use wd_01_confirmations::ConfirmationService;

    use crate::integration::support::{
        stub_registry, CountingNotifier, StubKeyringPolicy, StubSigner,
    };

    fn service_with_bus() -> (
        Arc<ConfirmationService<SystemTimeSource>>,
        Arc<InMemoryEventBus>,
        Arc<CountingNotifier>,
        Arc<StubSigner>,
    ) {
        let bus = Arc::new(InMemoryEventBus::new());
        let signer = Arc::new(StubSigner::new());
        let notifier = Arc::new(CountingNotifier::new());
        let service = Arc::new(ConfirmationService::new(
            stub_registry(signer.clone()),
            Arc::new(StubKeyringPolicy::new(false)),
            notifier.clone(),
            Arc::new(WalletBusAdapter::new(bus.clone())),
            SystemTimeSource,
        ));
        (service, bus, notifier, signer)
    }

    fn submission(id: &str, payload: ConfirmationPayload) -> ConfirmationSubmission {
        ConfirmationSubmission::new(
            RequestId::new(id),
            Origin::external("https://dapp.example"),
            payload,
        )
    }

    /// Three pending requests of different kinds; reset rejects all three
    /// with WalletReset, the queue is empty, and the badge ends at zero.
    #[tokio::test]
    async fn test_reset_rejects_mixed_kinds() {
        let (service, bus, notifier, signer) = service_with_bus();

        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Reset]));

        let evm = service
            .enqueue(submission(
                "req-evm",
                ConfirmationPayload::EvmSignMessage(EvmSignMessagePayload {
                    address: "0xAA".to_string(),
                    message: b"hello".to_vec(),
                }),
            ))
            .await
            .expect("evm enqueue");
        let ton = service
            .enqueue(submission(
                "req-ton",
                ConfirmationPayload::TonSendTransaction(TonTransferPayload {
                    from: "t-from".to_string(),
                    to: "t-to".to_string(),
                    amount: "7".to_string(),
                    comment: None,
                }),
            ))
            .await
            .expect("ton enqueue");
        let cardano = service
            .enqueue(submission(
                "req-ada",
                ConfirmationPayload::CardanoSignTransaction(CardanoTxPayload {
                    cbor: vec![0xa0],
                    partial_sign: false,
                }),
            ))
            .await
            .expect("cardano enqueue");

        let rejected = service.reset_all().await;
        assert_eq!(rejected, 3);

        // Every requester future rejects with the reset error.
        for pending in [evm, ton, cardano] {
            let err = pending.wait().await.expect_err("must reject");
            assert_eq!(err, ConfirmationError::WalletReset);
        }

        // Queue and resolver table are both empty; nothing half-alive.
        assert_eq!(service.pending_count().await, 0);
        assert!(service.queue_snapshot().await.is_empty());

        // No signing happened on the reset path.
        assert_eq!(signer.call_count(), 0);

        // Badge ends at zero so the approver surface may close.
        assert_eq!(notifier.badge_history().last(), Some(&0));

        // Observers see the reset event with the rejected count.
        let event = timeout(Duration::from_millis(200), sub.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert!(matches!(event, WalletEvent::WalletReset { rejected: 3 }));
    }

    /// A reset with nothing pending is a no-op that still reports zero.
    #[tokio::test]
    async fn test_reset_on_empty_queue() {
        let (service, _bus, notifier, _signer) = service_with_bus();

        let rejected = service.reset_all().await;
        assert_eq!(rejected, 0);
        assert_eq!(notifier.badge_history(), vec![0]);
    }

    /// Ids from before a reset can never settle afterwards, even if the
    /// approver surface replays them.
    #[tokio::test]
    async fn test_reset_era_ids_stay_dead() {
        let (service, _bus, _notifier, signer) = service_with_bus();

        let pending = service
            .enqueue(submission(
                "req-old",
                ConfirmationPayload::EvmSignMessage(EvmSignMessagePayload {
                    address: "0xAA".to_string(),
                    message: b"old".to_vec(),
                }),
            ))
            .await
            .expect("enqueue");

        service.reset_all().await;
        pending.wait().await.expect_err("rejected by reset");

        let err = service
            .resolve(&RequestId::new("req-old"), ApproverVerdict::approve())
            .await
            .expect_err("stale approval must fail");
        assert!(matches!(err, ConfirmationError::NotFound(_)));
        assert_eq!(signer.call_count(), 0);
    }

    /// A fresh request with the same payload as a reset-era one is not a
    /// duplicate: reset fully releases dedup slots.
    #[tokio::test]
    async fn test_reset_releases_dedup_slots() {
        let (service, _bus, _notifier, _signer) = service_with_bus();

        let payload = ConfirmationPayload::EvmSignMessage(EvmSignMessagePayload {
            address: "0xAA".to_string(),
            message: b"again".to_vec(),
        });

        let pending = service
            .enqueue(submission("req-1", payload.clone()))
            .await
            .expect("first enqueue");
        service.reset_all().await;
        pending.wait().await.expect_err("rejected by reset");

        service
            .enqueue(submission("req-2", payload))
            .await
            .expect("identical payload accepted after reset");
    }
}
