//! Daily inventory cost estimation.

use super::UnknownCategorySkip;
use crate::core::{CategoryDemandStats, InventoryItem, ReplenishConfig};
use crate::error::{ReplenishError, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Daily holding and stockout cost estimates, aggregated by category and store.
#[derive(Debug, Clone, Serialize)]
pub struct CostSummary {
    pub holding_daily: f64,
    pub stockout_daily: f64,
    pub total_daily: f64,
    pub by_category: BTreeMap<String, f64>,
    pub by_store: BTreeMap<String, f64>,
    /// Items whose stockout cost could not be estimated for lack of demand
    /// statistics; they still contribute holding cost.
    pub unknown_categories: Vec<UnknownCategorySkip>,
}

/// Estimates holding and stockout costs from current stock and demand stats.
#[derive(Debug, Clone)]
pub struct CostEstimator {
    holding_cost_rate: f64,
    stockout_penalty: f64,
}

impl CostEstimator {
    pub fn new(config: &ReplenishConfig) -> Self {
        Self {
            holding_cost_rate: config.holding_cost_rate,
            stockout_penalty: config.stockout_penalty,
        }
    }

    /// Estimate daily costs across the inventory table.
    pub fn estimate(
        &self,
        inventory: &[InventoryItem],
        stats: &HashMap<String, CategoryDemandStats>,
    ) -> Result<CostSummary> {
        if inventory.is_empty() {
            return Err(ReplenishError::EmptyTable("inventory"));
        }

        let mut holding_daily = 0.0;
        let mut stockout_daily = 0.0;
        let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
        let mut by_store: BTreeMap<String, f64> = BTreeMap::new();
        let mut unknown_categories = Vec::new();

        for item in inventory {
            let holding =
                item.current_stock * item.storage_cost_per_unit * self.holding_cost_rate / 365.0;

            let stockout = match stats.get(&item.category) {
                Some(cat_stats) => self.stockout_cost(item, cat_stats),
                None => {
                    warn!(
                        store_id = %item.store_id,
                        product = %item.product_name,
                        category = %item.category,
                        "no demand statistics for item, stockout cost unavailable"
                    );
                    unknown_categories.push(UnknownCategorySkip {
                        store_id: item.store_id.clone(),
                        product_name: item.product_name.clone(),
                        category: item.category.clone(),
                    });
                    0.0
                }
            };

            let total = holding + stockout;
            holding_daily += holding;
            stockout_daily += stockout;
            *by_category.entry(item.category.clone()).or_insert(0.0) += total;
            *by_store.entry(item.store_id.clone()).or_insert(0.0) += total;
        }

        Ok(CostSummary {
            holding_daily,
            stockout_daily,
            total_daily: holding_daily + stockout_daily,
            by_category,
            by_store,
            unknown_categories,
        })
    }

    /// Expected daily stockout cost for one item.
    ///
    /// Stockout probability is the demand shortfall fraction, clamped at 0
    /// when stock covers mean demand. Zero mean demand means no stockout
    /// exposure, never a division fault.
    fn stockout_cost(&self, item: &InventoryItem, stats: &CategoryDemandStats) -> f64 {
        let avg_demand = stats.mean;
        if avg_demand <= 0.0 {
            return 0.0;
        }
        let probability = ((avg_demand - item.current_stock) / avg_demand).max(0.0);
        probability * avg_demand * self.stockout_penalty
    }
}
