//! # darkstore-replenish
//!
//! Inventory replenishment engine for a quick-commerce dark-store network.
//!
//! From two in-memory tables - hourly demand observations and current
//! inventory state - the engine produces per-category demand forecasts,
//! safety-stock/reorder-point/EOQ plans per SKU, an urgency-ranked
//! restocking schedule, and daily inventory cost estimates.
//!
//! # Example
//!
//! ```no_run
//! use darkstore_replenish::prelude::*;
//!
//! # fn demo(records: Vec<DemandRecord>, inventory: Vec<InventoryItem>) -> Result<()> {
//! let config = ReplenishConfig::default();
//! let report = ReplenishmentReport::generate(&records, &inventory, &config)?;
//!
//! for action in report.urgent_actions() {
//!     println!(
//!         "{} at {}: {:?}, order {:.0} units",
//!         action.product_name, action.store_id, action.urgency, action.suggested_order_qty
//!     );
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod features;
pub mod forecast;
pub mod planning;
pub mod report;
pub mod utils;

pub use error::{ReplenishError, Result};

pub mod prelude {
    pub use crate::core::{
        compute_category_stats, CategoryDemandStats, DemandRecord, InventoryItem,
        ReplenishConfig, ServiceLevel,
    };
    pub use crate::error::{ReplenishError, Result};
    pub use crate::features::{build_features, FeatureRow};
    pub use crate::forecast::{DemandForecaster, ForecastPoint, ModelPerformance, ModelSet};
    pub use crate::planning::{
        CostEstimator, CostSummary, RestockAction, RestockScheduler, StockLevelPlan,
        StockLevelPlanner, Urgency,
    };
    pub use crate::report::{ReplenishmentReport, ReportWarning};
}
