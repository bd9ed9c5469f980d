//! Core contracts for the loadgen event synthesizers.
//!
//! This crate defines the two seams every event family plugs into:
//! the record contract ([`SinkRecord`]) describing one synthesized
//! event and its serialization projections, and the generator contract
//! ([`LoadGenerator`]) describing the unbounded, cancellable
//! production loop.
//!
//! # Architecture
//!
//! ```text
//! LoadGenerator (one task per event family)
//!        │ compute batch, advance state
//!        ▼
//! deliver() ── CancellationToken checked at every handoff
//!        │
//!        ▼
//! mpsc::Sender<BoxedRecord> ──► destination sink (Kafka, Postgres, ...)
//! ```
//!
//! Generators own their state (counters, catalogs, seeded RNG) and are
//! single-writer; the bounded channel is the only shared hand-off
//! point, and its capacity is the caller's decision.

pub mod generator;
pub mod record;
pub mod timestamp;

// Re-exports for convenience
pub use generator::{deliver, LoadGenerator};
pub use record::{sql_str, BoxedRecord, SinkRecord};
pub use timestamp::{format_timestamp_naive, format_timestamptz};
