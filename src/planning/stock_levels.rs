//! Safety stock, reorder point, and economic order quantity per SKU.

use super::UnknownCategorySkip;
use crate::core::{CategoryDemandStats, InventoryItem, ReplenishConfig, ServiceLevel};
use crate::error::{ReplenishError, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Stock-level targets for one (store, product).
///
/// Invariant: `optimal_max_stock = reorder_point + eoq` with `eoq >= 0`.
#[derive(Debug, Clone, Serialize)]
pub struct StockLevelPlan {
    pub store_id: String,
    pub product_name: String,
    pub category: String,
    pub current_stock: f64,
    pub avg_daily_demand: f64,
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub optimal_max_stock: f64,
    pub eoq: f64,
    pub lead_time_hours: f64,
    pub service_level: f64,
}

/// Result of a planning pass: plans plus the rows that had to be excluded.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub plans: Vec<StockLevelPlan>,
    pub skipped: Vec<UnknownCategorySkip>,
}

/// Computes stock-level targets from demand statistics and lead times.
#[derive(Debug, Clone)]
pub struct StockLevelPlanner {
    order_cost: f64,
    holding_cost_rate: f64,
}

impl StockLevelPlanner {
    pub fn new(config: &ReplenishConfig) -> Self {
        Self {
            order_cost: config.order_cost,
            holding_cost_rate: config.holding_cost_rate,
        }
    }

    /// Compute a plan for every inventory item whose category has statistics.
    ///
    /// Items referencing an unknown category are excluded and reported in the
    /// outcome's `skipped` list; demand statistics are never defaulted.
    pub fn plan(
        &self,
        inventory: &[InventoryItem],
        stats: &HashMap<String, CategoryDemandStats>,
        service_level: ServiceLevel,
    ) -> Result<PlanOutcome> {
        if inventory.is_empty() {
            return Err(ReplenishError::EmptyTable("inventory"));
        }

        let z = service_level.z_score();
        let mut plans = Vec::with_capacity(inventory.len());
        let mut skipped = Vec::new();

        for item in inventory {
            let Some(cat_stats) = stats.get(&item.category) else {
                warn!(
                    store_id = %item.store_id,
                    product = %item.product_name,
                    category = %item.category,
                    "excluding inventory row: category has no demand statistics"
                );
                skipped.push(UnknownCategorySkip {
                    store_id: item.store_id.clone(),
                    product_name: item.product_name.clone(),
                    category: item.category.clone(),
                });
                continue;
            };

            plans.push(self.plan_item(item, cat_stats, service_level, z));
        }

        Ok(PlanOutcome { plans, skipped })
    }

    fn plan_item(
        &self,
        item: &InventoryItem,
        stats: &CategoryDemandStats,
        service_level: ServiceLevel,
        z: f64,
    ) -> StockLevelPlan {
        let avg_demand = stats.mean;
        let demand_std = effective_demand_std(stats);
        let lead_time_days = item.lead_time_hours / 24.0;

        let avg_demand_during_lead_time = avg_demand * lead_time_days;
        let safety_stock = z * demand_std * lead_time_days.sqrt();

        let holding_cost = item.storage_cost_per_unit * self.holding_cost_rate;
        let eoq = economic_order_quantity(avg_demand, holding_cost, self.order_cost);

        let reorder_point = avg_demand_during_lead_time + safety_stock;
        let optimal_max_stock = reorder_point + eoq;

        StockLevelPlan {
            store_id: item.store_id.clone(),
            product_name: item.product_name.clone(),
            category: item.category.clone(),
            current_stock: item.current_stock,
            avg_daily_demand: avg_demand,
            safety_stock,
            reorder_point,
            optimal_max_stock,
            eoq,
            lead_time_hours: item.lead_time_hours,
            service_level: service_level.as_fraction(),
        }
    }
}

/// Demand standard deviation with the zero-variance floor.
///
/// A category whose observed std is zero (or negative through numeric noise)
/// takes 20% of its mean, so safety stock never degenerates to zero.
fn effective_demand_std(stats: &CategoryDemandStats) -> f64 {
    if stats.std > 0.0 {
        stats.std
    } else {
        stats.mean * 0.2
    }
}

/// EOQ with the zero-holding-cost guard.
///
/// When holding cost is zero the classic formula would divide by zero; the
/// fallback is one week of mean demand.
fn economic_order_quantity(avg_demand: f64, holding_cost: f64, order_cost: f64) -> f64 {
    if holding_cost > 0.0 {
        let annual_demand = avg_demand * 365.0;
        (2.0 * annual_demand * order_cost / holding_cost).sqrt()
    } else {
        avg_demand * 7.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn item(category: &str, lead_time_hours: f64, storage_cost: f64) -> InventoryItem {
        InventoryItem {
            store_id: "DS-01".to_string(),
            product_name: "Milk 1L".to_string(),
            category: category.to_string(),
            current_stock: 40.0,
            lead_time_hours,
            storage_cost_per_unit: storage_cost,
            supplier_reliability: 0.95,
        }
    }

    fn dairy_stats() -> HashMap<String, CategoryDemandStats> {
        let mut stats = HashMap::new();
        stats.insert(
            "Dairy".to_string(),
            CategoryDemandStats {
                mean: 20.0,
                std: 5.0,
                max: 35.0,
            },
        );
        stats
    }

    fn planner() -> StockLevelPlanner {
        StockLevelPlanner::new(&ReplenishConfig::default())
    }

    #[test]
    fn dairy_reorder_point_at_95_percent() {
        // mean=20, std=5, lead_time=12h, z=1.65:
        // avg during lead time = 20 * 0.5 = 10
        // safety stock = 1.65 * 5 * sqrt(0.5) ~= 5.83
        let outcome = planner()
            .plan(&[item("Dairy", 12.0, 2.0)], &dairy_stats(), ServiceLevel::P95)
            .unwrap();

        let plan = &outcome.plans[0];
        assert_relative_eq!(plan.avg_daily_demand, 20.0, epsilon = 1e-10);
        assert_relative_eq!(plan.safety_stock, 1.65 * 5.0 * 0.5_f64.sqrt(), epsilon = 1e-10);
        assert_relative_eq!(plan.safety_stock, 5.83, epsilon = 0.01);
        assert_relative_eq!(plan.reorder_point, 15.83, epsilon = 0.01);
        assert_relative_eq!(plan.service_level, 0.95, epsilon = 1e-10);
    }

    #[test]
    fn max_stock_is_reorder_point_plus_eoq() {
        let outcome = planner()
            .plan(&[item("Dairy", 24.0, 1.5)], &dairy_stats(), ServiceLevel::P99)
            .unwrap();

        let plan = &outcome.plans[0];
        assert!(plan.eoq >= 0.0);
        assert!(plan.reorder_point >= 0.0);
        assert_relative_eq!(
            plan.optimal_max_stock,
            plan.reorder_point + plan.eoq,
            epsilon = 1e-10
        );
        assert!(plan.optimal_max_stock >= plan.reorder_point);
    }

    #[test]
    fn zero_storage_cost_falls_back_to_week_of_demand() {
        let mut stats = HashMap::new();
        stats.insert(
            "Dairy".to_string(),
            CategoryDemandStats {
                mean: 14.0,
                std: 3.0,
                max: 20.0,
            },
        );

        let outcome = planner()
            .plan(&[item("Dairy", 12.0, 0.0)], &stats, ServiceLevel::P95)
            .unwrap();

        assert_relative_eq!(outcome.plans[0].eoq, 98.0, epsilon = 1e-10);
    }

    #[test]
    fn zero_variance_floors_demand_std() {
        let mut stats = HashMap::new();
        stats.insert(
            "Dairy".to_string(),
            CategoryDemandStats {
                mean: 20.0,
                std: 0.0,
                max: 20.0,
            },
        );

        let outcome = planner()
            .plan(&[item("Dairy", 24.0, 2.0)], &stats, ServiceLevel::P95)
            .unwrap();

        // std floor: 20 * 0.2 = 4 -> safety stock = 1.65 * 4 * sqrt(1) = 6.6
        assert_relative_eq!(outcome.plans[0].safety_stock, 6.6, epsilon = 1e-10);
    }

    #[test]
    fn unknown_category_is_excluded_and_reported() {
        let outcome = planner()
            .plan(
                &[item("Dairy", 12.0, 2.0), item("Frozen", 12.0, 2.0)],
                &dairy_stats(),
                ServiceLevel::P95,
            )
            .unwrap();

        assert_eq!(outcome.plans.len(), 1);
        assert_eq!(outcome.plans[0].category, "Dairy");
        assert_eq!(
            outcome.skipped,
            vec![UnknownCategorySkip {
                store_id: "DS-01".to_string(),
                product_name: "Milk 1L".to_string(),
                category: "Frozen".to_string(),
            }]
        );
    }

    #[test]
    fn empty_inventory_is_fatal() {
        let result = planner().plan(&[], &dairy_stats(), ServiceLevel::P95);
        assert!(matches!(result, Err(ReplenishError::EmptyTable("inventory"))));
    }

    #[test]
    fn z_score_scales_safety_stock() {
        let inventory = [item("Dairy", 12.0, 2.0)];
        let p90 = planner()
            .plan(&inventory, &dairy_stats(), ServiceLevel::P90)
            .unwrap();
        let p99 = planner()
            .plan(&inventory, &dairy_stats(), ServiceLevel::P99)
            .unwrap();

        assert!(p99.plans[0].safety_stock > p90.plans[0].safety_stock);
        assert_relative_eq!(
            p99.plans[0].safety_stock / p90.plans[0].safety_stock,
            2.33 / 1.28,
            epsilon = 1e-10
        );
    }
}
