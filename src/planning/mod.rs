//! Stock-level planning, restock scheduling, and inventory cost estimation.

pub mod costs;
pub mod schedule;
pub mod stock_levels;

pub use costs::{CostEstimator, CostSummary};
pub use schedule::{RestockAction, RestockScheduler, Urgency};
pub use stock_levels::{PlanOutcome, StockLevelPlan, StockLevelPlanner};

use serde::Serialize;

/// An inventory row excluded because its category has no demand statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnknownCategorySkip {
    pub store_id: String,
    pub product_name: String,
    pub category: String,
}
