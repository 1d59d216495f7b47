//! Demand feature construction.
//!
//! Derives the engineered columns the forecaster trains on: cyclical time
//! encodings plus per-category lag and moving-average features. The input
//! record table is never mutated; features are built into a fresh collection
//! per category and concatenated.

use crate::core::DemandRecord;
use crate::error::{ReplenishError, Result};
use chrono::{Datelike, Timelike};
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Number of engineered features per row.
pub const FEATURE_COUNT: usize = 7;

/// One fully-populated feature row; no column is ever missing.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub store_id: String,
    pub category: String,
    /// Observed demand, the regression target.
    pub demand: f64,
    pub hour_sin: f64,
    pub hour_cos: f64,
    pub day_sin: f64,
    pub day_cos: f64,
    pub demand_lag_1: f64,
    pub demand_lag_2: f64,
    pub demand_ma_3: f64,
}

impl FeatureRow {
    /// The feature vector in training order.
    pub fn feature_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.hour_sin,
            self.hour_cos,
            self.day_sin,
            self.day_cos,
            self.demand_lag_1,
            self.demand_lag_2,
            self.demand_ma_3,
        ]
    }
}

/// Cyclical encoding of an hour of day (0-23).
pub fn encode_hour(hour: u32) -> (f64, f64) {
    let angle = 2.0 * PI * hour as f64 / 24.0;
    (angle.sin(), angle.cos())
}

/// Cyclical encoding of a day of week (Monday = 0).
pub fn encode_day_of_week(day: u32) -> (f64, f64) {
    let angle = 2.0 * PI * day as f64 / 7.0;
    (angle.sin(), angle.cos())
}

/// Build feature rows for every record, independently per category.
///
/// Output is grouped by category (ascending by name) and sorted by timestamp
/// within each category. Fails only on an empty input table.
pub fn build_features(records: &[DemandRecord]) -> Result<Vec<FeatureRow>> {
    if records.is_empty() {
        return Err(ReplenishError::EmptyTable("demand"));
    }

    let mut by_category: BTreeMap<&str, Vec<&DemandRecord>> = BTreeMap::new();
    for record in records {
        by_category
            .entry(record.category.as_str())
            .or_default()
            .push(record);
    }

    let mut rows = Vec::with_capacity(records.len());
    for (category, group) in by_category {
        rows.extend(category_rows(category, group)?);
    }
    Ok(rows)
}

/// Build feature rows for a single category.
///
/// Fails with `InsufficientData` if the category has zero records.
pub fn build_category_features(
    category: &str,
    records: &[DemandRecord],
) -> Result<Vec<FeatureRow>> {
    let group: Vec<&DemandRecord> = records
        .iter()
        .filter(|r| r.category == category)
        .collect();
    if group.is_empty() {
        return Err(ReplenishError::InsufficientData {
            category: category.to_string(),
        });
    }
    category_rows(category, group)
}

fn category_rows(category: &str, mut group: Vec<&DemandRecord>) -> Result<Vec<FeatureRow>> {
    if group.is_empty() {
        return Err(ReplenishError::InsufficientData {
            category: category.to_string(),
        });
    }

    group.sort_by_key(|r| r.timestamp);
    let demands: Vec<f64> = group.iter().map(|r| r.demand_quantity).collect();

    let lag_1: Vec<Option<f64>> = (0..demands.len())
        .map(|i| i.checked_sub(1).map(|j| demands[j]))
        .collect();
    let lag_2: Vec<Option<f64>> = (0..demands.len())
        .map(|i| i.checked_sub(2).map(|j| demands[j]))
        .collect();
    // Trailing 3-window mean, inclusive of current; undefined until 3 records
    let ma_3: Vec<Option<f64>> = (0..demands.len())
        .map(|i| {
            if i >= 2 {
                Some((demands[i - 2] + demands[i - 1] + demands[i]) / 3.0)
            } else {
                None
            }
        })
        .collect();

    // A category with fewer records than the lag depth has no value to fill
    // from; fall back to its first observed demand.
    let fallback = demands[0];
    let lag_1 = fill_gaps(lag_1, fallback);
    let lag_2 = fill_gaps(lag_2, fallback);
    let ma_3 = fill_gaps(ma_3, fallback);

    Ok(group
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let (hour_sin, hour_cos) = encode_hour(record.timestamp.hour());
            let (day_sin, day_cos) =
                encode_day_of_week(record.timestamp.weekday().num_days_from_monday());
            FeatureRow {
                timestamp: record.timestamp,
                store_id: record.store_id.clone(),
                category: record.category.clone(),
                demand: record.demand_quantity,
                hour_sin,
                hour_cos,
                day_sin,
                day_cos,
                demand_lag_1: lag_1[i],
                demand_lag_2: lag_2[i],
                demand_ma_3: ma_3[i],
            }
        })
        .collect())
}

/// Back-fill then forward-fill a sparse column.
///
/// Leading gaps take the first available value; trailing gaps take the last
/// preceding value. If the whole column is empty, every slot takes `fallback`.
fn fill_gaps(column: Vec<Option<f64>>, fallback: f64) -> Vec<f64> {
    let mut filled: Vec<Option<f64>> = column;

    // Backward pass
    let mut next = None;
    for slot in filled.iter_mut().rev() {
        match slot {
            Some(v) => next = Some(*v),
            None => *slot = next,
        }
    }
    // Forward pass
    let mut prev = None;
    for slot in filled.iter_mut() {
        match slot {
            Some(v) => prev = Some(*v),
            None => *slot = prev,
        }
    }

    filled.into_iter().map(|v| v.unwrap_or(fallback)).collect()
}
