use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Product events
    ProductCreated(i64),
    ProductUpdated(i64),
    ProductDeleted(i64),

    // Stock events
    StockCreated(i64),
    StockUpdated(i64),
    StockDeleted(i64),

    // Stock line events
    StockLineCreated(i64),
    StockLineUpdated(i64),
    StockLineDeleted(i64),
    StockLevelAdjusted {
        stock_line_id: i64,
        product_id: i64,
        previous_units: Decimal,
        new_units: Decimal,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    /// Event name used for logging and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Event::ProductCreated(_) => "product_created",
            Event::ProductUpdated(_) => "product_updated",
            Event::ProductDeleted(_) => "product_deleted",
            Event::StockCreated(_) => "stock_created",
            Event::StockUpdated(_) => "stock_updated",
            Event::StockDeleted(_) => "stock_deleted",
            Event::StockLineCreated(_) => "stock_line_created",
            Event::StockLineUpdated(_) => "stock_line_updated",
            Event::StockLineDeleted(_) => "stock_line_deleted",
            Event::StockLevelAdjusted { .. } => "stock_level_adjusted",
        }
    }
}

/// Consumes events off the channel until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        counter!("inventory_api.events.processed", 1, "event" => event.name());

        match &event {
            Event::StockLevelAdjusted {
                stock_line_id,
                product_id,
                previous_units,
                new_units,
                timestamp,
            } => {
                info!(
                    stock_line_id = %stock_line_id,
                    product_id = %product_id,
                    previous_units = %previous_units,
                    new_units = %new_units,
                    %timestamp,
                    "stock level adjusted"
                );
            }
            other => {
                info!(event = other.name(), "Received event: {:?}", other);
            }
        }
    }

    warn!("Event channel closed; stopping event processing loop");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn sender_delivers_events_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender.send(Event::ProductCreated(1)).await.unwrap();
        sender
            .send(Event::StockLevelAdjusted {
                stock_line_id: 9,
                product_id: 1,
                previous_units: dec!(10),
                new_units: dec!(7),
                timestamp: Utc::now(),
            })
            .await
            .unwrap();

        assert!(matches!(rx.recv().await, Some(Event::ProductCreated(1))));
        match rx.recv().await {
            Some(Event::StockLevelAdjusted {
                stock_line_id,
                new_units,
                ..
            }) => {
                assert_eq!(stock_line_id, 9);
                assert_eq!(new_units, dec!(7));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let sender = EventSender::new(tx);
        assert!(sender.send(Event::ProductDeleted(3)).await.is_err());
    }
}
