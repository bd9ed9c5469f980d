//! Destination sinks consuming the generated record stream.
//!
//! Sinks are deliberately thin collaborators: the generators decide
//! what to emit, the sinks only move records to their destination.
//! Retry and backoff policy belongs to the destination client
//! libraries, not here; a failed write surfaces as an error and stops
//! the drain loop, except for per-record serialization faults which
//! are logged and skipped.

use async_trait::async_trait;
use loadgen_core::SinkRecord;

pub mod kafka;
pub mod postgresql;
pub mod stdout;

pub use kafka::{KafkaOpts, KafkaSink};
pub use postgresql::{PostgresOpts, PostgresSink};
pub use stdout::StdoutSink;

/// A destination for synthesized records.
#[async_trait]
pub trait Sink: Send {
    /// Deliver one record to the destination.
    async fn write(&mut self, record: &dyn SinkRecord) -> anyhow::Result<()>;

    /// Flush buffered output, if any.
    async fn flush(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
