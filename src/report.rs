//! Full-pipeline report generation.
//!
//! One synchronous batch pass: raw records are turned into features, models,
//! forecasts, stock-level plans, a restocking schedule, and a cost summary.
//! Per-category and per-row failures are collected as warnings; only empty
//! input tables abort the run.

use crate::core::{compute_category_stats, DemandRecord, InventoryItem, ReplenishConfig};
use crate::error::{ReplenishError, Result};
use crate::features::build_features;
use crate::forecast::{DemandForecaster, ForecastPoint, ModelPerformance};
use crate::planning::{
    CostEstimator, CostSummary, RestockAction, RestockScheduler, StockLevelPlan,
    StockLevelPlanner, Urgency,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Non-fatal condition encountered while generating a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReportWarning {
    /// A category had too few feature rows to train a model.
    ModelTrainingSkipped { category: String, rows: usize },
    /// An inventory row was excluded from stock-level planning.
    PlanSkipped {
        store_id: String,
        product_name: String,
        category: String,
    },
    /// An item's stockout cost could not be estimated.
    StockoutCostUnavailable {
        store_id: String,
        product_name: String,
        category: String,
    },
}

/// Complete replenishment analysis for one batch run.
#[derive(Debug, Clone)]
pub struct ReplenishmentReport {
    pub generated_at: DateTime<Utc>,
    pub model_performance: BTreeMap<String, ModelPerformance>,
    pub forecasts: Vec<ForecastPoint>,
    pub stock_plans: Vec<StockLevelPlan>,
    /// Already sorted: urgency severity descending, then projected stock
    /// ascending.
    pub schedule: Vec<RestockAction>,
    pub costs: CostSummary,
    pub warnings: Vec<ReportWarning>,
}

impl ReplenishmentReport {
    /// Run the whole pipeline over the two input tables.
    pub fn generate(
        records: &[DemandRecord],
        inventory: &[InventoryItem],
        config: &ReplenishConfig,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(ReplenishError::EmptyTable("demand"));
        }
        if inventory.is_empty() {
            return Err(ReplenishError::EmptyTable("inventory"));
        }

        let mut warnings = Vec::new();

        info!(records = records.len(), "building demand features");
        let stats = compute_category_stats(records)?;
        let feature_rows = build_features(records)?;

        info!("training per-category demand models");
        let training = DemandForecaster::train(&feature_rows)?;
        for skip in &training.skipped {
            warnings.push(ReportWarning::ModelTrainingSkipped {
                category: skip.category.clone(),
                rows: skip.rows,
            });
        }

        info!(horizon_hours = config.forecast_horizon_hours, "forecasting demand");
        let forecasts = training.models.forecast(config.forecast_horizon_hours);

        info!(items = inventory.len(), "computing stock-level plans");
        let planner = StockLevelPlanner::new(config);
        let plan_outcome = planner.plan(inventory, &stats, config.service_level)?;
        for skip in plan_outcome.skipped {
            warnings.push(ReportWarning::PlanSkipped {
                store_id: skip.store_id,
                product_name: skip.product_name,
                category: skip.category,
            });
        }

        info!("generating restocking schedule");
        let scheduler = RestockScheduler::new(config.restock_window_hours);
        let schedule = scheduler.schedule(&forecasts, &plan_outcome.plans, inventory);

        info!("estimating inventory costs");
        let costs = CostEstimator::new(config).estimate(inventory, &stats)?;
        for skip in &costs.unknown_categories {
            warnings.push(ReportWarning::StockoutCostUnavailable {
                store_id: skip.store_id.clone(),
                product_name: skip.product_name.clone(),
                category: skip.category.clone(),
            });
        }

        Ok(Self {
            generated_at: Utc::now(),
            model_performance: training.performance,
            forecasts,
            stock_plans: plan_outcome.plans,
            schedule,
            costs,
            warnings,
        })
    }

    /// Actions needing urgent attention (Critical or High), in schedule order.
    pub fn urgent_actions(&self) -> impl Iterator<Item = &RestockAction> {
        self.schedule
            .iter()
            .filter(|a| a.urgency >= Urgency::High)
    }
}
