//! Property-based tests for the restocking schedule and stock-level plans.
//!
//! These verify invariants that must hold for all valid inputs, using
//! randomly generated inventory and demand statistics.

use darkstore_replenish::prelude::*;
use proptest::prelude::*;
use std::collections::HashMap;

fn make_item(idx: usize, stock: f64, lead_time_hours: f64, storage_cost: f64) -> InventoryItem {
    InventoryItem {
        store_id: format!("DS-{:02}", idx % 3),
        product_name: format!("product-{idx}"),
        category: format!("category-{idx}"),
        current_stock: stock,
        lead_time_hours,
        storage_cost_per_unit: storage_cost,
        supplier_reliability: 0.9,
    }
}

fn make_plan(item: &InventoryItem, reorder_point: f64, eoq: f64) -> StockLevelPlan {
    StockLevelPlan {
        store_id: item.store_id.clone(),
        product_name: item.product_name.clone(),
        category: item.category.clone(),
        current_stock: item.current_stock,
        avg_daily_demand: 20.0,
        safety_stock: 5.0,
        reorder_point,
        optimal_max_stock: reorder_point + eoq,
        eoq,
        lead_time_hours: item.lead_time_hours,
        service_level: 0.95,
    }
}

/// Strategy: a batch of (current_stock, reorder_point, eoq) triples.
fn inventory_strategy() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec(
        (0.0..300.0_f64, 1.0..150.0_f64, 0.0..200.0_f64),
        1..40,
    )
}

proptest! {
    #[test]
    fn schedule_is_totally_ordered(batch in inventory_strategy()) {
        let inventory: Vec<InventoryItem> = batch
            .iter()
            .enumerate()
            .map(|(i, &(stock, _, _))| make_item(i, stock, 12.0, 2.0))
            .collect();
        let plans: Vec<StockLevelPlan> = inventory
            .iter()
            .zip(batch.iter())
            .map(|(item, &(_, rp, eoq))| make_plan(item, rp, eoq))
            .collect();

        let actions = RestockScheduler::new(24).schedule(&[], &plans, &inventory);
        prop_assert_eq!(actions.len(), inventory.len());

        for pair in actions.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            // Severity never increases down the list
            prop_assert!(a.urgency.severity() >= b.urgency.severity());
            // Within equal urgency, more depleted items come first
            if a.urgency == b.urgency {
                prop_assert!(a.projected_stock_24h <= b.projected_stock_24h);
            }
        }
    }

    #[test]
    fn needs_restock_iff_projected_at_or_below_reorder_point(batch in inventory_strategy()) {
        let inventory: Vec<InventoryItem> = batch
            .iter()
            .enumerate()
            .map(|(i, &(stock, _, _))| make_item(i, stock, 12.0, 2.0))
            .collect();
        let plans: Vec<StockLevelPlan> = inventory
            .iter()
            .zip(batch.iter())
            .map(|(item, &(_, rp, eoq))| make_plan(item, rp, eoq))
            .collect();

        let actions = RestockScheduler::new(24).schedule(&[], &plans, &inventory);

        for action in &actions {
            prop_assert_eq!(
                action.needs_restock,
                action.projected_stock_24h <= action.reorder_point
            );
            prop_assert!(action.suggested_order_qty >= 0.0);
            if !action.needs_restock {
                prop_assert_eq!(action.suggested_order_qty, 0.0);
            }
        }
    }

    #[test]
    fn plans_hold_stock_level_invariants(
        mean in 0.5..200.0_f64,
        std in 0.0..50.0_f64,
        lead_time_hours in 1.0..72.0_f64,
        storage_cost in 0.0..10.0_f64,
    ) {
        let mut stats = HashMap::new();
        stats.insert(
            "category-0".to_string(),
            CategoryDemandStats { mean, std, max: mean * 2.0 },
        );
        let inventory = vec![make_item(0, 50.0, lead_time_hours, storage_cost)];

        let planner = StockLevelPlanner::new(&ReplenishConfig::default());
        let outcome = planner.plan(&inventory, &stats, ServiceLevel::P95).unwrap();
        let plan = &outcome.plans[0];

        prop_assert!(plan.eoq >= 0.0);
        prop_assert!(plan.reorder_point >= 0.0);
        prop_assert!(plan.optimal_max_stock >= plan.reorder_point);
        prop_assert!(plan.safety_stock.is_finite());
        prop_assert!((plan.optimal_max_stock - plan.reorder_point - plan.eoq).abs() < 1e-9);
    }
}
