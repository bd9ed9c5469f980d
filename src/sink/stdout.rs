//! JSON-lines sink for dry runs and local debugging.

use crate::sink::Sink;
use async_trait::async_trait;
use loadgen_core::SinkRecord;
use tokio::io::{AsyncWriteExt, BufWriter, Stdout};

/// Writes each record's structured-document projection as one line on
/// standard output.
pub struct StdoutSink {
    out: BufWriter<Stdout>,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            out: BufWriter::new(tokio::io::stdout()),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sink for StdoutSink {
    async fn write(&mut self, record: &dyn SinkRecord) -> anyhow::Result<()> {
        let mut line = match record.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                // Per-record fault: skip, never abort the stream.
                tracing::warn!(
                    topic = record.topic(),
                    key = %record.key(),
                    "skipping record that failed JSON encoding: {e}"
                );
                return Ok(());
            }
        };
        line.push(b'\n');
        self.out.write_all(&line).await?;
        Ok(())
    }

    async fn flush(&mut self) -> anyhow::Result<()> {
        self.out.flush().await?;
        Ok(())
    }
}
