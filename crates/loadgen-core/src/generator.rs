//! The load-generator contract and the shared delivery discipline.

use crate::record::BoxedRecord;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A source of synthesized events.
///
/// One implementation exists per event family. Each instance owns its
/// state (seeded RNG, counters, reference catalogs) and is driven by a
/// single task, so no locking is needed inside a generator.
#[async_trait]
pub trait LoadGenerator: Send {
    /// The fixed set of destination topics this generator emits to.
    ///
    /// Pure and callable at any time; sinks use it to pre-create
    /// topics before the stream starts.
    fn topics(&self) -> Vec<&'static str>;

    /// Run the unbounded production loop.
    ///
    /// On each iteration the generator computes one batch of records
    /// from current state, advances state, and offers every record of
    /// the batch to `out` before the next iteration begins. The loop
    /// observes `cancel` before and at every handoff and returns
    /// promptly once it fires; cancellation is the only termination
    /// path apart from the consumer dropping the receiving end, which
    /// is treated the same way.
    async fn load(&mut self, cancel: CancellationToken, out: mpsc::Sender<BoxedRecord>);
}

/// Offer one record to the output channel, yielding to cancellation.
///
/// This is the single blocking point of a production loop: the send
/// may wait on channel backpressure, so cancellation latency is
/// bounded by at most one handoff. Returns `false` when the loop
/// should stop, either because the token fired or because the
/// consumer went away.
pub async fn deliver(
    cancel: &CancellationToken,
    out: &mpsc::Sender<BoxedRecord>,
    record: BoxedRecord,
) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = out.send(record) => sent.is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SinkRecord;

    #[derive(Debug)]
    struct SampleRecord(i64);

    impl SinkRecord for SampleRecord {
        fn topic(&self) -> &'static str {
            "sample"
        }

        fn key(&self) -> String {
            self.0.to_string()
        }

        fn to_insert_sql(&self) -> String {
            format!("INSERT INTO sample (id) VALUES ({})", self.0)
        }

        fn to_json(&self) -> serde_json::Result<Vec<u8>> {
            serde_json::to_vec(&serde_json::json!({ "id": self.0 }))
        }
    }

    // Sinks borrow the record across their write await points inside
    // spawned tasks, so `&dyn SinkRecord` must stay usable in a Send
    // future. This fails to compile if the trait loses `Sync`.
    #[tokio::test]
    async fn test_record_ref_usable_across_await_in_spawned_task() {
        async fn inspect(record: &dyn SinkRecord) -> String {
            tokio::task::yield_now().await;
            record.key()
        }

        let record: BoxedRecord = Box::new(SampleRecord(7));
        let key = tokio::spawn(async move { inspect(record.as_ref()).await })
            .await
            .unwrap();
        assert_eq!(key, "7");
    }

    #[tokio::test]
    async fn test_deliver_sends_when_capacity_available() {
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel::<BoxedRecord>(1);

        assert!(deliver(&cancel, &tx, Box::new(SampleRecord(7))).await);

        let record = rx.recv().await.unwrap();
        assert_eq!(record.topic(), "sample");
        assert_eq!(record.key(), "7");
    }

    #[tokio::test]
    async fn test_deliver_refuses_after_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (tx, mut rx) = mpsc::channel::<BoxedRecord>(1);

        assert!(!deliver(&cancel, &tx, Box::new(SampleRecord(1))).await);

        // Nothing was handed over.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_deliver_stops_on_closed_channel() {
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::channel::<BoxedRecord>(1);
        drop(rx);

        assert!(!deliver(&cancel, &tx, Box::new(SampleRecord(1))).await);
    }

    #[tokio::test]
    async fn test_deliver_unblocks_full_channel_on_cancel() {
        let cancel = CancellationToken::new();
        let (tx, _rx) = mpsc::channel::<BoxedRecord>(1);

        // Fill the only slot; the next send would block forever.
        assert!(deliver(&cancel, &tx, Box::new(SampleRecord(1))).await);

        let pending = {
            let cancel = cancel.clone();
            let tx = tx.clone();
            tokio::spawn(async move { deliver(&cancel, &tx, Box::new(SampleRecord(2))).await })
        };

        cancel.cancel();
        let delivered = tokio::time::timeout(std::time::Duration::from_secs(1), pending)
            .await
            .expect("delivery did not observe cancellation")
            .unwrap();
        assert!(!delivered);
    }
}
