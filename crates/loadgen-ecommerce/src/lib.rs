//! E-commerce order/shipment event synthesis.
//!
//! Each order lives through two lifecycle events on the
//! `parcel_events` topic, an `order_created` marker and a later
//! `parcel_shipped` marker, plus one `order_events` record per item in
//! the order. In-flight orders form a sliding window between the two
//! counters the generator carries: a parcel can never ship before its
//! order exists, and orders ship strictly in creation sequence.

pub mod events;
pub mod generator;

// Re-exports for convenience
pub use events::{
    OrderEvent, ParcelEvent, ParcelEventType, ORDER_EVENTS_TOPIC, PARCEL_EVENTS_TOPIC,
};
pub use generator::{CatalogError, EcommerceGen, DEFAULT_CATALOG_SIZE};
