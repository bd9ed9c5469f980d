//! E-commerce record types and their serialization projections.

use loadgen_core::{sql_str, SinkRecord};
use serde::Serialize;

/// Destination topic for order-line records.
pub const ORDER_EVENTS_TOPIC: &str = "order_events";

/// Destination topic for order lifecycle markers.
pub const PARCEL_EVENTS_TOPIC: &str = "parcel_events";

/// One order line: a single item within a newly placed order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderEvent {
    pub order_id: i64,
    pub item_id: i64,
    pub item_price: f64,
    pub event_timestamp: String,
}

impl SinkRecord for OrderEvent {
    fn topic(&self) -> &'static str {
        ORDER_EVENTS_TOPIC
    }

    fn key(&self) -> String {
        self.order_id.to_string()
    }

    fn to_insert_sql(&self) -> String {
        format!(
            "INSERT INTO order_events (order_id, item_id, item_price, event_timestamp) VALUES ({}, {}, {}, {})",
            self.order_id,
            self.item_id,
            self.item_price,
            sql_str(&self.event_timestamp),
        )
    }

    fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Lifecycle stage of an order's parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelEventType {
    OrderCreated,
    ParcelShipped,
}

impl ParcelEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "order_created",
            Self::ParcelShipped => "parcel_shipped",
        }
    }
}

/// A lifecycle marker for one order.
#[derive(Debug, Clone, Serialize)]
pub struct ParcelEvent {
    pub order_id: i64,
    pub event_timestamp: String,
    pub event_type: ParcelEventType,
}

impl SinkRecord for ParcelEvent {
    fn topic(&self) -> &'static str {
        PARCEL_EVENTS_TOPIC
    }

    fn key(&self) -> String {
        self.order_id.to_string()
    }

    fn to_insert_sql(&self) -> String {
        format!(
            "INSERT INTO parcel_events (order_id, event_timestamp, event_type) VALUES ({}, {}, {})",
            self.order_id,
            sql_str(&self.event_timestamp),
            sql_str(self.event_type.as_str()),
        )
    }

    fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
