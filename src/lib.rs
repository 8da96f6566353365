// Expose the modules.
pub mod config;
pub mod domain;
pub mod replay;

// Re-export key types for easier usage.
pub use domain::models::types::{ask, bid, Blotter, Order, OrderStatus, Side, Trade, TypeError};
pub use domain::services::book::{Book, BookError, DEFAULT_SNAPSHOT_DEPTH};
pub use domain::services::order_queue::{OrderQueue, QueueError};
pub use domain::services::price_level::PriceLevel;
pub use domain::services::snapshot::{Snapshot, SnapshotLevel};
pub use replay::{book_from_ingest, ingest, replay as replay_orders, ReplayError};
