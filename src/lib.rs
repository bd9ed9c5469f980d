//! loadgen library
//!
//! Wiring between the event synthesizers and their destinations. The
//! generators themselves live in dedicated crates:
//!
//! - `loadgen-core` - generator/record contracts
//! - `loadgen-adclick` - ad impression/click events
//! - `loadgen-ecommerce` - order and parcel lifecycle events
//!
//! This crate adds the destination sinks (stdout, Kafka, PostgreSQL)
//! and the pipeline that fans generator tasks into one bounded channel
//! drained by a single sink.

pub mod pipeline;
pub mod sink;
