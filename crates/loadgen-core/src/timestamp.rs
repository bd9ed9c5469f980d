//! Timestamp format profiles for synthesized events.
//!
//! Two profiles are required by the downstream pipeline: one with an
//! explicit timezone offset for event pairs whose ordering across a
//! small interval matters to watermarking (ad clicks), and one naive
//! local form (e-commerce events). Both carry full microsecond
//! precision.

use chrono::{DateTime, TimeZone};
use std::fmt;

/// `YYYY-MM-DD HH:MM:SS.ffffff+HH:MM`
const TIMESTAMPTZ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f%:z";

/// `YYYY-MM-DD HH:MM:SS.ffffff`
const TIMESTAMP_NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Render a timestamp with its explicit timezone offset.
pub fn format_timestamptz<Tz: TimeZone>(ts: DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    ts.format(TIMESTAMPTZ_FORMAT).to_string()
}

/// Render a timestamp in naive local form, dropping the offset.
pub fn format_timestamp_naive<Tz: TimeZone>(ts: DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    ts.format(TIMESTAMP_NAIVE_FORMAT).to_string()
}
