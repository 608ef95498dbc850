//! Notification delivery as effects.

use crate::core::EventRecord;
use crate::ledger::TokenLedger;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use thiserror::Error;

/// An external observer of ledger notifications.
pub trait EventSink {
    /// Hand one record to the observer.
    fn deliver(&self, record: &EventRecord) -> Result<(), DispatchError>;

    /// Whether the observer can accept deliveries right now.
    fn is_available(&self) -> bool {
        true
    }
}

/// Errors raised while delivering notifications.
///
/// These never reach the ledger; its state is already committed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Observer rejected event {sequence}: {reason}")]
    Rejected { sequence: u64, reason: String },

    #[error("Observer unavailable")]
    Unavailable,
}

/// What happened to a batch of notifications.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Sequence numbers accepted by the observer
    pub delivered: Vec<u64>,
    pub failed: Vec<DispatchError>,
}

impl DispatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deliver `records` to the environment's sink, in order.
///
/// A rejected record is logged and reported, and delivery carries on with
/// the next one. The effect fails only when the sink is unavailable, in
/// which case nothing is delivered.
pub fn dispatch<Env>(records: Vec<EventRecord>) -> BoxedEffect<DispatchReport, DispatchError, Env>
where
    Env: EventSink + Clone + Send + Sync + 'static,
{
    from_fn(move |env: &Env| {
        if !env.is_available() {
            tracing::warn!(pending = records.len(), "observer unavailable");
            return Err(DispatchError::Unavailable);
        }

        let mut report = DispatchReport::default();
        for record in &records {
            match env.deliver(record) {
                Ok(()) => report.delivered.push(record.sequence),
                Err(err) => {
                    tracing::warn!(sequence = record.sequence, %err, "notification not delivered");
                    report.failed.push(err);
                }
            }
        }
        tracing::debug!(
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "dispatched notifications"
        );
        Ok(report)
    })
    .boxed()
}

/// Deliver the ledger's pending notifications to `env`'s sink.
///
/// The dispatch effect runs first; the ledger's delivery cursor is moved
/// afterwards, and only across records the sink accepted (see
/// [`TokenLedger::acknowledge`]). An unavailable sink leaves every record
/// pending, and a rejected record is offered again on the next publish
/// together with the records after it.
pub async fn publish_pending<Env>(
    ledger: &mut TokenLedger,
    env: &Env,
) -> Result<DispatchReport, DispatchError>
where
    Env: EventSink + Clone + Send + Sync + 'static,
{
    let pending = ledger.pending_notifications().to_vec();
    let report = dispatch(pending).run(env).await?;
    let acknowledged = ledger.acknowledge(&report.delivered);
    tracing::debug!(acknowledged, "advanced delivery cursor");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attributes, Identity, TokenId};
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct RecordingSink {
        seen: Arc<Mutex<Vec<u64>>>,
        reject: Option<u64>,
        available: bool,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                seen: Arc::new(Mutex::new(Vec::new())),
                reject: None,
                available: true,
            }
        }

        fn seen(&self) -> Vec<u64> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl EventSink for RecordingSink {
        fn deliver(&self, record: &EventRecord) -> Result<(), DispatchError> {
            if self.reject == Some(record.sequence) {
                return Err(DispatchError::Rejected {
                    sequence: record.sequence,
                    reason: "index full".to_string(),
                });
            }
            self.seen.lock().unwrap().push(record.sequence);
            Ok(())
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    fn pending_sequences(ledger: &TokenLedger) -> Vec<u64> {
        ledger
            .pending_notifications()
            .iter()
            .map(|record| record.sequence)
            .collect()
    }

    fn ledger_with_events() -> TokenLedger {
        let admin = Identity::new("admin");
        let alice = Identity::new("alice");
        let mut ledger = TokenLedger::new(admin.clone());
        let a = ledger
            .mint(&admin, alice.clone(), "ipfs://a", Attributes::new(3, 3, 3))
            .unwrap();
        let b = ledger
            .mint(&admin, alice.clone(), "ipfs://b", Attributes::new(1, 1, 1))
            .unwrap();
        ledger.battle(&alice, a, b).unwrap();
        ledger
    }

    #[tokio::test]
    async fn publish_delivers_in_order() {
        let mut ledger = ledger_with_events();
        let sink = RecordingSink::new();

        let report = publish_pending(&mut ledger, &sink).await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.delivered, vec![0, 1, 2]);
        assert_eq!(sink.seen(), vec![0, 1, 2]);
        assert!(ledger.pending_notifications().is_empty());
    }

    #[tokio::test]
    async fn rejected_record_does_not_stop_delivery() {
        let mut ledger = ledger_with_events();
        let mut sink = RecordingSink::new();
        sink.reject = Some(1);

        let report = publish_pending(&mut ledger, &sink).await.unwrap();

        assert_eq!(report.delivered, vec![0, 2]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(sink.seen(), vec![0, 2]);
        assert_eq!(pending_sequences(&ledger), vec![1, 2]);

        sink.reject = None;
        let report = publish_pending(&mut ledger, &sink).await.unwrap();
        assert_eq!(report.delivered, vec![1, 2]);
        assert!(ledger.pending_notifications().is_empty());
    }

    #[tokio::test]
    async fn unavailable_sink_fails_whole_batch() {
        let ledger = ledger_with_events();
        let mut sink = RecordingSink::new();
        sink.available = false;

        let records = ledger.history().records().to_vec();
        let result = dispatch(records).run(&sink).await;

        assert_eq!(result.unwrap_err(), DispatchError::Unavailable);
        assert!(sink.seen().is_empty());
    }

    #[tokio::test]
    async fn unavailable_sink_keeps_notifications_pending() {
        let mut ledger = ledger_with_events();
        let mut sink = RecordingSink::new();
        sink.available = false;

        let before = ledger.experience(TokenId(1)).unwrap();
        let result = publish_pending(&mut ledger, &sink).await;

        assert_eq!(result.unwrap_err(), DispatchError::Unavailable);
        assert_eq!(ledger.experience(TokenId(1)).unwrap(), before);
        assert_eq!(ledger.history().len(), 3);
        assert_eq!(pending_sequences(&ledger), vec![0, 1, 2]);

        sink.available = true;
        let report = publish_pending(&mut ledger, &sink).await.unwrap();
        assert_eq!(report.delivered, vec![0, 1, 2]);
        assert_eq!(sink.seen(), vec![0, 1, 2]);
        assert!(ledger.pending_notifications().is_empty());
    }
}
