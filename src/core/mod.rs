//! Core data model: input fact rows, derived statistics, and configuration.

pub mod config;
pub mod records;

pub use config::{ReplenishConfig, ServiceLevel};
pub use records::{compute_category_stats, CategoryDemandStats, DemandRecord, InventoryItem};
