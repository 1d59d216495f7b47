//! Input fact rows and derived demand statistics.

use crate::error::{ReplenishError, Result};
use crate::utils::stats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One observed (store, category, hour) demand bucket.
///
/// Immutable fact row produced by the ingestion collaborator. Derived columns
/// (hour, day-of-week, cyclical encodings, lags) are always computed, never
/// stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub timestamp: DateTime<Utc>,
    pub store_id: String,
    pub category: String,
    pub demand_quantity: f64,
    pub stock_available: f64,
    pub orders_fulfilled: u32,
    pub orders_cancelled: u32,
    pub delivery_time_minutes: f64,
    pub csat_score: f64,
}

/// Present-moment stock state for one SKU at one store.
///
/// Read-only inside the engine; restock execution mutates it elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub store_id: String,
    pub product_name: String,
    pub category: String,
    pub current_stock: f64,
    pub lead_time_hours: f64,
    pub storage_cost_per_unit: f64,
    pub supplier_reliability: f64,
}

/// Demand statistics for one category over all observed records.
///
/// Recomputed per analysis run, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryDemandStats {
    pub mean: f64,
    pub std: f64,
    pub max: f64,
}

/// Compute per-category demand statistics over the full record table.
///
/// Single-observation categories get `std = 0.0`; downstream consumers apply
/// their own zero-variance guards.
pub fn compute_category_stats(
    records: &[DemandRecord],
) -> Result<HashMap<String, CategoryDemandStats>> {
    if records.is_empty() {
        return Err(ReplenishError::EmptyTable("demand"));
    }

    let mut by_category: HashMap<String, Vec<f64>> = HashMap::new();
    for record in records {
        by_category
            .entry(record.category.clone())
            .or_default()
            .push(record.demand_quantity);
    }

    let stats = by_category
        .into_iter()
        .map(|(category, demands)| {
            let std = if demands.len() > 1 {
                stats::std_dev(&demands)
            } else {
                0.0
            };
            (
                category,
                CategoryDemandStats {
                    mean: stats::mean(&demands),
                    std,
                    max: stats::max(&demands),
                },
            )
        })
        .collect();

    Ok(stats)
}
