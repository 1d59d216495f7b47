//! Urgency-ranked restocking schedule.
//!
//! Combines demand forecasts with stock-level targets into a prioritized
//! action list. The output ordering is the schedule's primary contract:
//! urgency severity descending, ties broken by projected stock ascending
//! (most depleted first).

use crate::core::InventoryItem;
use crate::forecast::ForecastPoint;
use crate::planning::StockLevelPlan;
use chrono::Duration;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Restocking urgency, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    /// Severity rank: Critical=4 down to Low=1.
    pub fn severity(self) -> u8 {
        match self {
            Urgency::Critical => 4,
            Urgency::High => 3,
            Urgency::Medium => 2,
            Urgency::Low => 1,
        }
    }

    /// Classify projected stock against the reorder point.
    fn classify(projected_stock: f64, reorder_point: f64) -> Self {
        if projected_stock <= 0.0 {
            Urgency::Critical
        } else if projected_stock <= reorder_point * 0.5 {
            Urgency::High
        } else if projected_stock <= reorder_point {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }
}

/// One prioritized restocking recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct RestockAction {
    pub store_id: String,
    pub product_name: String,
    pub category: String,
    pub current_stock: f64,
    pub predicted_demand_24h: f64,
    pub projected_stock_24h: f64,
    pub reorder_point: f64,
    pub needs_restock: bool,
    pub urgency: Urgency,
    pub suggested_order_qty: f64,
    pub lead_time_hours: f64,
    pub supplier_reliability: f64,
}

/// Builds the restocking schedule from forecasts, plans, and inventory.
#[derive(Debug, Clone)]
pub struct RestockScheduler {
    restock_window_hours: u32,
}

impl RestockScheduler {
    pub fn new(restock_window_hours: u32) -> Self {
        Self {
            restock_window_hours,
        }
    }

    /// Produce the ordered action list.
    ///
    /// Plans are joined to inventory by the (store_id, category) composite
    /// key; when several products share a key the first plan wins. Items
    /// without a matching plan are skipped. A category without forecast
    /// points contributes zero predicted demand - an absent forecast is "no
    /// restock signal available," not observed zero demand.
    pub fn schedule(
        &self,
        forecasts: &[ForecastPoint],
        plans: &[StockLevelPlan],
        inventory: &[InventoryItem],
    ) -> Vec<RestockAction> {
        let window_demand = self.window_demand_by_category(forecasts);

        let mut plan_index: HashMap<(&str, &str), &StockLevelPlan> = HashMap::new();
        for plan in plans {
            plan_index
                .entry((plan.store_id.as_str(), plan.category.as_str()))
                .or_insert(plan);
        }

        let mut actions = Vec::with_capacity(inventory.len());
        for item in inventory {
            let key = (item.store_id.as_str(), item.category.as_str());
            let Some(plan) = plan_index.get(&key) else {
                debug!(
                    store_id = %item.store_id,
                    product = %item.product_name,
                    "no stock-level plan for item, skipping"
                );
                continue;
            };

            let predicted_demand_24h = window_demand
                .get(item.category.as_str())
                .copied()
                .unwrap_or(0.0);
            let projected_stock_24h = item.current_stock - predicted_demand_24h;

            let urgency = Urgency::classify(projected_stock_24h, plan.reorder_point);
            let needs_restock = projected_stock_24h <= plan.reorder_point;
            let suggested_order_qty = if needs_restock {
                (plan.optimal_max_stock - item.current_stock).max(0.0)
            } else {
                0.0
            };

            actions.push(RestockAction {
                store_id: item.store_id.clone(),
                product_name: item.product_name.clone(),
                category: item.category.clone(),
                current_stock: item.current_stock,
                predicted_demand_24h,
                projected_stock_24h,
                reorder_point: plan.reorder_point,
                needs_restock,
                urgency,
                suggested_order_qty,
                lead_time_hours: item.lead_time_hours,
                supplier_reliability: item.supplier_reliability,
            });
        }

        actions.sort_by(|a, b| {
            b.urgency
                .cmp(&a.urgency)
                .then(a.projected_stock_24h.total_cmp(&b.projected_stock_24h))
        });
        actions
    }

    /// Sum forecast demand per category over the first window of the horizon.
    fn window_demand_by_category<'a>(
        &self,
        forecasts: &'a [ForecastPoint],
    ) -> HashMap<&'a str, f64> {
        let mut sums: HashMap<&str, f64> = HashMap::new();
        let Some(start) = forecasts.iter().map(|p| p.timestamp).min() else {
            return sums;
        };
        let end = start + Duration::hours(i64::from(self.restock_window_hours));

        for point in forecasts.iter().filter(|p| p.timestamp < end) {
            *sums.entry(point.category.as_str()).or_insert(0.0) += point.predicted_demand;
        }
        sums
    }
}
