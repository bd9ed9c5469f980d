//! The sliding-window order/shipment state machine.

use crate::events::{
    OrderEvent, ParcelEvent, ParcelEventType, ORDER_EVENTS_TOPIC, PARCEL_EVENTS_TOPIC,
};
use async_trait::async_trait;
use chrono::Local;
use loadgen_core::{deliver, format_timestamp_naive, BoxedRecord, LoadGenerator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Catalog size used by [`EcommerceGen::new`].
pub const DEFAULT_CATALOG_SIZE: usize = 1000;

/// Upper bound (exclusive) for generated item prices.
const MAX_ITEM_PRICE: f64 = 10_000.0;

/// Construction-time configuration error.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The generator could never pick an item price mid-stream.
    #[error("catalog must contain at least one item price")]
    Empty,
}

/// E-commerce synthesizer.
///
/// Orders are modeled as a sliding window between two counters:
/// `next_order_id` advances as new orders are placed, `next_ship_id`
/// trails it and advances as the oldest pending order ships. The
/// invariant `next_ship_id <= next_order_id` holds after every tick,
/// so shipments appear for strictly increasing order ids and never for
/// an order that was not announced first.
pub struct EcommerceGen {
    rng: StdRng,
    /// Advances exactly once per placed order, starting at 0.
    next_order_id: i64,
    /// Trails `next_order_id`; advances exactly once per shipment.
    next_ship_id: i64,
    /// Item id -> item price, fixed at construction.
    catalog: Vec<f64>,
}

impl EcommerceGen {
    /// Create a generator with the default catalog size.
    pub fn new(seed: u64) -> Self {
        Self::build(seed, DEFAULT_CATALOG_SIZE)
    }

    /// Create a generator with a caller-chosen catalog size.
    ///
    /// Fails fast on an empty catalog; that configuration cannot be
    /// recovered once the stream is running.
    pub fn with_catalog_size(seed: u64, catalog_size: usize) -> Result<Self, CatalogError> {
        if catalog_size == 0 {
            return Err(CatalogError::Empty);
        }
        Ok(Self::build(seed, catalog_size))
    }

    fn build(seed: u64, catalog_size: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let catalog = (0..catalog_size)
            .map(|_| rng.gen_range(0.0..MAX_ITEM_PRICE))
            .collect();
        Self {
            rng,
            next_order_id: 0,
            next_ship_id: 0,
            catalog,
        }
    }

    /// Orders placed but not yet shipped.
    pub fn pending_orders(&self) -> i64 {
        self.next_order_id - self.next_ship_id
    }

    /// Compute one tick's batch, flipping the order-vs-ship coin.
    fn generate(&mut self) -> Vec<BoxedRecord> {
        let place_order = self.rng.gen_bool(0.5);
        self.step(place_order)
    }

    /// Fire one transition of the state machine.
    ///
    /// A true coin places a new order: the order counter advances, one
    /// order-line record is emitted per item, and an `order_created`
    /// marker follows them. A false coin ships the oldest pending
    /// order. Shipping is gated on `next_ship_id < next_order_id`; when
    /// nothing is pending the tick produces no records rather than
    /// shipping an order that does not exist. Counters advance before
    /// any emission is attempted and are never rolled back.
    fn step(&mut self, place_order: bool) -> Vec<BoxedRecord> {
        let ts = format_timestamp_naive(Local::now());
        if place_order {
            self.next_order_id += 1;
            let item_count = self.rng.gen_range(1..=4);
            let mut records: Vec<BoxedRecord> = Vec::with_capacity(item_count + 1);
            for _ in 0..item_count {
                let item_id = self.rng.gen_range(0..self.catalog.len());
                records.push(Box::new(OrderEvent {
                    order_id: self.next_order_id,
                    item_id: item_id as i64,
                    item_price: self.catalog[item_id],
                    event_timestamp: ts.clone(),
                }));
            }
            records.push(Box::new(ParcelEvent {
                order_id: self.next_order_id,
                event_timestamp: ts,
                event_type: ParcelEventType::OrderCreated,
            }));
            records
        } else if self.next_ship_id < self.next_order_id {
            self.next_ship_id += 1;
            vec![Box::new(ParcelEvent {
                order_id: self.next_ship_id,
                event_timestamp: ts,
                event_type: ParcelEventType::ParcelShipped,
            })]
        } else {
            // Nothing pending to ship.
            Vec::new()
        }
    }
}

#[async_trait]
impl LoadGenerator for EcommerceGen {
    fn topics(&self) -> Vec<&'static str> {
        vec![ORDER_EVENTS_TOPIC, PARCEL_EVENTS_TOPIC]
    }

    async fn load(&mut self, cancel: CancellationToken, out: mpsc::Sender<BoxedRecord>) {
        loop {
            if cancel.is_cancelled() {
                return;
            }
            let records = self.generate();
            if records.is_empty() {
                // Keep the task cooperative on ticks that emit nothing.
                tokio::task::yield_now().await;
                continue;
            }
            for record in records {
                if !deliver(&cancel, &out, record).await {
                    return;
                }
            }
        }
    }
}
