//! Ad-click event synthesis.
//!
//! The simplest event family: stateless apart from its private seeded
//! RNG, it fabricates one impression/click pair per tick. The click
//! always lands at or after the impression within a one second window,
//! which downstream watermarking depends on.

use async_trait::async_trait;
use chrono::{Duration, Local};
use loadgen_core::{deliver, format_timestamptz, sql_str, BoxedRecord, LoadGenerator, SinkRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Destination topic for click events.
pub const AD_CLICKS_TOPIC: &str = "ad_clicks";

/// Target table for the row-insert projection.
const AD_CLICKS_TABLE: &str = "ad_source";

/// One synthetic ad impression and the click it attracted.
#[derive(Debug, Clone, Serialize)]
pub struct ClickEvent {
    pub user_id: i64,
    pub ad_id: i64,
    pub click_timestamp: String,
    pub impression_timestamp: String,
}

impl SinkRecord for ClickEvent {
    fn topic(&self) -> &'static str {
        AD_CLICKS_TOPIC
    }

    fn key(&self) -> String {
        self.user_id.to_string()
    }

    fn to_insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} (user_id, ad_id, click_timestamp, impression_timestamp) VALUES ({}, {}, {}, {})",
            AD_CLICKS_TABLE,
            self.user_id,
            self.ad_id,
            sql_str(&self.click_timestamp),
            sql_str(&self.impression_timestamp),
        )
    }

    fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Ad-click synthesizer.
///
/// Emits exactly one [`ClickEvent`] per tick, keyed by user id. No
/// state is carried across ticks.
pub struct AdClickGen {
    rng: StdRng,
}

impl AdClickGen {
    /// Create a generator with a seeded RNG for reproducible streams.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn next_event(&mut self) -> ClickEvent {
        let impression = Local::now();
        // Click trails the impression by under one second.
        let click = impression + Duration::milliseconds(self.rng.gen_range(0..1000));
        ClickEvent {
            user_id: self.rng.gen_range(0..100_000),
            ad_id: self.rng.gen_range(0..10),
            click_timestamp: format_timestamptz(click),
            impression_timestamp: format_timestamptz(impression),
        }
    }
}

#[async_trait]
impl LoadGenerator for AdClickGen {
    fn topics(&self) -> Vec<&'static str> {
        vec![AD_CLICKS_TOPIC]
    }

    async fn load(&mut self, cancel: CancellationToken, out: mpsc::Sender<BoxedRecord>) {
        loop {
            let record = self.next_event();
            if !deliver(&cancel, &out, Box::new(record)).await {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    const TZ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f%:z";

    #[test]
    fn test_click_never_precedes_impression() {
        let mut gen = AdClickGen::new(42);

        for _ in 0..200 {
            let event = gen.next_event();
            let click = DateTime::parse_from_str(&event.click_timestamp, TZ_FORMAT).unwrap();
            let impression =
                DateTime::parse_from_str(&event.impression_timestamp, TZ_FORMAT).unwrap();

            let delay = click - impression;
            assert!(delay >= Duration::zero());
            assert!(delay < Duration::milliseconds(1000));
        }
    }

    #[test]
    fn test_id_ranges() {
        let mut gen = AdClickGen::new(7);

        for _ in 0..200 {
            let event = gen.next_event();
            assert!((0..100_000).contains(&event.user_id));
            assert!((0..10).contains(&event.ad_id));
        }
    }

    #[test]
    fn test_key_is_stringified_user_id() {
        let mut gen = AdClickGen::new(0);
        let event = gen.next_event();
        assert_eq!(event.key(), event.user_id.to_string());
    }

    #[test]
    fn test_topics() {
        let gen = AdClickGen::new(0);
        assert_eq!(gen.topics(), vec!["ad_clicks"]);
    }

    #[test]
    fn test_json_projection_preserves_types() {
        let event = ClickEvent {
            user_id: 12345,
            ad_id: 3,
            click_timestamp: "2024-03-01 12:34:56.789012+09:00".to_string(),
            impression_timestamp: "2024-03-01 12:34:56.500000+09:00".to_string(),
        };

        let decoded: serde_json::Value =
            serde_json::from_slice(&event.to_json().unwrap()).unwrap();

        assert_eq!(decoded["user_id"], serde_json::json!(12345));
        assert!(decoded["user_id"].is_i64());
        assert_eq!(decoded["ad_id"], serde_json::json!(3));
        assert_eq!(
            decoded["click_timestamp"],
            serde_json::json!("2024-03-01 12:34:56.789012+09:00")
        );
        assert!(decoded["impression_timestamp"].is_string());
    }

    #[test]
    fn test_insert_sql_shape() {
        let event = ClickEvent {
            user_id: 1,
            ad_id: 2,
            click_timestamp: "a".to_string(),
            impression_timestamp: "b".to_string(),
        };

        assert_eq!(
            event.to_insert_sql(),
            "INSERT INTO ad_source (user_id, ad_id, click_timestamp, impression_timestamp) VALUES (1, 2, 'a', 'b')"
        );
    }

    #[tokio::test]
    async fn test_load_returns_immediately_when_precancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (tx, mut rx) = mpsc::channel(8);

        let mut gen = AdClickGen::new(42);
        gen.load(cancel, tx).await;

        // No record may have been handed over after the token fired.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_emits_only_click_topic_records() {
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel(4);

        let handle = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let mut gen = AdClickGen::new(42);
                gen.load(cancel, tx).await;
            })
        };

        let record = rx.recv().await.unwrap();
        assert_eq!(record.topic(), "ad_clicks");
        record.key().parse::<i64>().unwrap();

        cancel.cancel();
        handle.await.unwrap();
    }
}
