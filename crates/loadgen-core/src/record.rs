//! Record contract shared by every event synthesizer.

use std::fmt;

/// One synthesized event, ready for delivery to a destination sink.
///
/// Records are immutable after construction; ownership passes to the
/// channel consumer on delivery. Each record knows its destination
/// topic, its partition key, and both serialization projections, so
/// sinks need no per-event-family knowledge.
///
/// `Sync` is required so sinks can hold `&dyn SinkRecord` across
/// their write await points inside spawned tasks; records are plain
/// data and satisfy it for free.
pub trait SinkRecord: Send + Sync + fmt::Debug {
    /// Destination channel (Kafka topic) this record belongs to.
    fn topic(&self) -> &'static str;

    /// Partition/grouping key: the stringified stable entity id.
    ///
    /// Consumers rely on this key for per-entity ordering and
    /// partitioning guarantees.
    fn key(&self) -> String;

    /// Row-insert projection: a complete INSERT statement against the
    /// record's fixed target table. String fields are quoted and
    /// escaped via [`sql_str`], numeric fields are rendered bare.
    fn to_insert_sql(&self) -> String;

    /// Structured-document projection: a JSON document with snake_case
    /// field names and type-preserving values (integers stay integers,
    /// currency stays floating point, timestamps stay strings).
    fn to_json(&self) -> serde_json::Result<Vec<u8>>;
}

/// Records cross the producer/consumer channel boxed so that
/// independent generators can share a single output channel.
pub type BoxedRecord = Box<dyn SinkRecord>;

/// Quote a string as a SQL literal, doubling embedded single quotes.
///
/// Current generators only feed numeric and timestamp values through
/// this, but the escaping keeps the projection safe should a string
/// source ever carry a quote.
pub fn sql_str(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_str_plain() {
        assert_eq!(sql_str("2024-01-01 00:00:00.000000"), "'2024-01-01 00:00:00.000000'");
    }

    #[test]
    fn test_sql_str_escapes_quotes() {
        assert_eq!(sql_str("o'brien"), "'o''brien'");
        assert_eq!(sql_str("''"), "''''''");
    }

    #[test]
    fn test_sql_str_empty() {
        assert_eq!(sql_str(""), "''");
    }
}
