//! Wiring between generator tasks, the shared channel, and one sink.

use crate::sink::Sink;
use anyhow::Context;
use loadgen_core::{BoxedRecord, LoadGenerator};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// How often the drain loop reports progress.
const PROGRESS_EVERY: u64 = 10_000;

/// Run the given generators into one sink until `cancel` fires.
///
/// Each generator gets its own task and a clone of the bounded
/// sender; the current task drains the receiving end. The function
/// returns once every generator has stopped and the channel is empty,
/// so no delivered record is lost on shutdown.
pub async fn run(
    generators: Vec<Box<dyn LoadGenerator>>,
    sink: Box<dyn Sink>,
    cancel: CancellationToken,
    channel_capacity: usize,
    qps: Option<u32>,
) -> anyhow::Result<()> {
    anyhow::ensure!(channel_capacity > 0, "channel capacity must be positive");
    if let Some(0) = qps {
        anyhow::bail!("--qps must be positive");
    }

    let (tx, rx) = mpsc::channel::<BoxedRecord>(channel_capacity);

    let mut tasks = Vec::with_capacity(generators.len());
    for mut generator in generators {
        tracing::info!("Starting generator for topics {:?}", generator.topics());
        let cancel = cancel.clone();
        let tx = tx.clone();
        tasks.push(tokio::spawn(async move {
            generator.load(cancel, tx).await;
        }));
    }
    // Drop the original sender so the drain loop ends once every
    // generator task has stopped.
    drop(tx);

    drain(rx, sink, qps).await?;

    for task in tasks {
        task.await.context("Generator task panicked")?;
    }

    Ok(())
}

/// Drain the channel into the sink until every sender is gone.
async fn drain(
    mut rx: mpsc::Receiver<BoxedRecord>,
    mut sink: Box<dyn Sink>,
    qps: Option<u32>,
) -> anyhow::Result<()> {
    let mut throttle = qps.map(|q| {
        let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(q)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval
    });

    let mut written = 0u64;
    while let Some(record) = rx.recv().await {
        if let Some(interval) = throttle.as_mut() {
            interval.tick().await;
        }
        sink.write(record.as_ref()).await?;
        written += 1;
        if written % PROGRESS_EVERY == 0 {
            tracing::info!("Delivered {written} records");
        }
    }

    sink.flush().await?;
    tracing::info!("Stream drained after {written} records");
    Ok(())
}
