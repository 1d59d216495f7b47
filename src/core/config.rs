//! Engine configuration and service-level policy.

use serde::Serialize;

/// Target probability of not stocking out during lead time.
///
/// Only the three standard levels are supported; `from_fraction` maps any
/// unrecognized fraction to the 95% level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceLevel {
    P90,
    P95,
    P99,
}

impl ServiceLevel {
    /// Map a service-level fraction to the nearest supported level.
    ///
    /// Unrecognized values fall back to 95%.
    pub fn from_fraction(fraction: f64) -> Self {
        if (fraction - 0.90).abs() < 1e-9 {
            ServiceLevel::P90
        } else if (fraction - 0.99).abs() < 1e-9 {
            ServiceLevel::P99
        } else {
            ServiceLevel::P95
        }
    }

    /// Standard normal z-score for this service level.
    pub fn z_score(self) -> f64 {
        match self {
            ServiceLevel::P90 => 1.28,
            ServiceLevel::P95 => 1.65,
            ServiceLevel::P99 => 2.33,
        }
    }

    /// The service level as a fraction, for output tables.
    pub fn as_fraction(self) -> f64 {
        match self {
            ServiceLevel::P90 => 0.90,
            ServiceLevel::P95 => 0.95,
            ServiceLevel::P99 => 0.99,
        }
    }
}

impl Default for ServiceLevel {
    fn default() -> Self {
        ServiceLevel::P95
    }
}

/// Tunable constants for a replenishment run.
#[derive(Debug, Clone)]
pub struct ReplenishConfig {
    /// Service level for safety-stock sizing.
    pub service_level: ServiceLevel,
    /// Forecast horizon in hours past the last observed timestamp.
    pub forecast_horizon_hours: u32,
    /// Window over which forecast demand is summed for restock decisions.
    pub restock_window_hours: u32,
    /// Fixed cost per replenishment order, used in the EOQ formula.
    pub order_cost: f64,
    /// Annualized holding-cost rate applied to storage cost per unit.
    pub holding_cost_rate: f64,
    /// Cost per lost unit of demand when stocked out.
    pub stockout_penalty: f64,
}

impl Default for ReplenishConfig {
    fn default() -> Self {
        Self {
            service_level: ServiceLevel::P95,
            forecast_horizon_hours: 72,
            restock_window_hours: 24,
            order_cost: 50.0,
            holding_cost_rate: 0.2,
            stockout_penalty: 5.0,
        }
    }
}
