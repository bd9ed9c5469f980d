//! Kafka destination sink.

use crate::sink::Sink;
use anyhow::{Context, Result};
use async_trait::async_trait;
use loadgen_core::SinkRecord;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::time::Duration;

/// Kafka connection options.
#[derive(clap::Args, Clone, Debug)]
pub struct KafkaOpts {
    /// Kafka broker addresses
    #[arg(long, default_value = "localhost:9092", env = "KAFKA_BROKERS")]
    pub brokers: String,

    /// Partition count for auto-created topics
    #[arg(long, default_value = "3")]
    pub topic_partitions: i32,
}

/// Publishes each record to its destination topic, keyed by the
/// record's partition key.
pub struct KafkaSink {
    producer: FutureProducer,
    brokers: String,
}

impl KafkaSink {
    /// Create the producer and pre-create every topic the configured
    /// generators can emit to.
    pub async fn new(opts: &KafkaOpts, topics: &[&'static str]) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &opts.brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .context("Failed to create Kafka producer")?;

        let sink = Self {
            producer,
            brokers: opts.brokers.clone(),
        };

        for topic in topics {
            sink.create_topic_if_not_exists(topic, opts.topic_partitions)
                .await?;
        }

        Ok(sink)
    }

    /// Create a Kafka topic if it doesn't exist.
    async fn create_topic_if_not_exists(&self, topic: &str, partitions: i32) -> Result<()> {
        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()
            .context("Failed to create admin client")?;

        let new_topic = NewTopic::new(topic, partitions, TopicReplication::Fixed(1));
        let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(5)));

        match admin_client.create_topics(&[new_topic], &opts).await {
            Ok(results) => {
                for result in results {
                    match result {
                        Ok(topic_name) => {
                            tracing::info!("Topic '{topic_name}' created successfully");
                        }
                        Err((topic_name, err)) => {
                            if err.to_string().contains("already exists") {
                                tracing::info!("Topic '{topic_name}' already exists");
                            } else {
                                return Err(anyhow::anyhow!("Failed to create topic: {err}"));
                            }
                        }
                    }
                }
            }
            Err(e) => return Err(anyhow::anyhow!("Failed to create topics: {e}")),
        }

        Ok(())
    }
}

#[async_trait]
impl Sink for KafkaSink {
    async fn write(&mut self, record: &dyn SinkRecord) -> Result<()> {
        let payload = match record.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    topic = record.topic(),
                    key = %record.key(),
                    "skipping record that failed JSON encoding: {e}"
                );
                return Ok(());
            }
        };
        let key = record.key();

        let message = FutureRecord::to(record.topic())
            .key(key.as_bytes())
            .payload(&payload);

        self.producer
            .send(message, Duration::from_secs(5))
            .await
            .map_err(|(err, _)| err)
            .with_context(|| format!("Failed to send record to topic '{}'", record.topic()))?;

        tracing::debug!("Published record to {} (key={})", record.topic(), key);
        Ok(())
    }
}
