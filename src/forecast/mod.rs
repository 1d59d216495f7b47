//! Per-category demand forecasting.
//!
//! One independent linear model is trained per product category over the
//! engineered features, on a chronological 80/20 split with held-out error
//! metrics. Categories with too few rows are skipped and reported, never
//! fatal.

pub mod linear;
pub mod scaler;

use crate::error::{ReplenishError, Result};
use crate::features::{encode_day_of_week, encode_hour, FeatureRow, FEATURE_COUNT};
use crate::utils::metrics::calculate_metrics;
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use linear::LinearModel;
use scaler::ColumnScaler;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Minimum feature rows a category needs to train a model.
pub const MIN_TRAINING_ROWS: usize = 4;

/// Held-out error metrics for one category's model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelPerformance {
    pub mae: f64,
    pub rmse: f64,
    /// None when the held-out actuals contain zeros.
    pub mape: Option<f64>,
}

/// A category excluded from training, with the row count that disqualified it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedCategory {
    pub category: String,
    pub rows: usize,
}

/// One forecasted demand value for one category at one future hour.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub hour: u32,
    pub category: String,
    /// Clamped at zero; demand cannot be negative.
    pub predicted_demand: f64,
}

/// Fitted model plus the lag context frozen at the end of observed history.
#[derive(Debug, Clone)]
struct CategoryModel {
    model: LinearModel,
    scaler: ColumnScaler,
    demand_lag_1: f64,
    demand_lag_2: f64,
    demand_ma_3: f64,
}

/// Trained models for all categories that had enough data.
#[derive(Debug, Clone)]
pub struct ModelSet {
    models: BTreeMap<String, CategoryModel>,
    last_timestamp: DateTime<Utc>,
}

/// Result of a training run: models, held-out metrics, and skipped categories.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub models: ModelSet,
    pub performance: BTreeMap<String, ModelPerformance>,
    pub skipped: Vec<SkippedCategory>,
}

/// Trains one linear demand model per category.
pub struct DemandForecaster;

impl DemandForecaster {
    /// Train models over pre-built feature rows.
    ///
    /// Rows are grouped by category and split chronologically: the earliest
    /// 80% trains the model, the remainder is held out for MAE/RMSE/MAPE.
    /// Feature standardization is fit on the training split only. Categories
    /// with fewer than [`MIN_TRAINING_ROWS`] rows are skipped with a warning.
    pub fn train(rows: &[FeatureRow]) -> Result<TrainingOutcome> {
        if rows.is_empty() {
            return Err(ReplenishError::EmptyTable("features"));
        }

        let last_timestamp = rows
            .iter()
            .map(|r| r.timestamp)
            .max()
            .expect("non-empty rows have a max timestamp");

        let mut by_category: BTreeMap<&str, Vec<&FeatureRow>> = BTreeMap::new();
        for row in rows {
            by_category.entry(row.category.as_str()).or_default().push(row);
        }

        let mut models = BTreeMap::new();
        let mut performance = BTreeMap::new();
        let mut skipped = Vec::new();

        for (category, mut group) in by_category {
            if group.len() < MIN_TRAINING_ROWS {
                warn!(category, rows = group.len(), "skipping category: too few feature rows");
                skipped.push(SkippedCategory {
                    category: category.to_string(),
                    rows: group.len(),
                });
                continue;
            }

            group.sort_by_key(|r| r.timestamp);
            let features: Vec<[f64; FEATURE_COUNT]> =
                group.iter().map(|r| r.feature_vector()).collect();
            let targets: Vec<f64> = group.iter().map(|r| r.demand).collect();

            let split = (group.len() as f64 * 0.8) as usize;
            let (train_x, test_x) = features.split_at(split);
            let (train_y, test_y) = targets.split_at(split);

            let scaler = ColumnScaler::fit(train_x);
            let model = LinearModel::fit(&scaler.transform_all(train_x), train_y)?;

            let predictions: Vec<f64> = test_x
                .iter()
                .map(|x| model.predict(&scaler.transform(x)).max(0.0))
                .collect();
            let metrics = calculate_metrics(test_y, &predictions)?;
            debug!(category, mae = metrics.mae, rmse = metrics.rmse, "trained demand model");

            performance.insert(
                category.to_string(),
                ModelPerformance {
                    mae: metrics.mae,
                    rmse: metrics.rmse,
                    mape: metrics.mape,
                },
            );

            // Lag context for forecasting: the tail of observed history
            let n = targets.len();
            models.insert(
                category.to_string(),
                CategoryModel {
                    model,
                    scaler,
                    demand_lag_1: targets[n - 1],
                    demand_lag_2: targets[n - 2],
                    demand_ma_3: targets[n - 3..].iter().sum::<f64>() / 3.0,
                },
            );
        }

        Ok(TrainingOutcome {
            models: ModelSet {
                models,
                last_timestamp,
            },
            performance,
            skipped,
        })
    }
}

impl ModelSet {
    /// Categories with a trained model, in ascending name order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(|k| k.as_str())
    }

    /// Whether a category has a trained model.
    pub fn contains(&self, category: &str) -> bool {
        self.models.contains_key(category)
    }

    /// Last observed timestamp across the whole training table.
    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.last_timestamp
    }

    /// Predict demand for one category from a raw feature vector.
    ///
    /// Scaling is applied internally; the output is clamped at zero. Returns
    /// `FitRequired` when the category has no trained model.
    pub fn predict(&self, category: &str, features: &[f64; FEATURE_COUNT]) -> Result<f64> {
        let entry = self.models.get(category).ok_or(ReplenishError::FitRequired)?;
        Ok(entry.model.predict(&entry.scaler.transform(features)).max(0.0))
    }

    /// Forecast every modeled category for the next `horizon_hours` hours.
    ///
    /// Cyclical encodings come from each target timestamp while the lag
    /// features stay pinned to the tail of observed history; they are not
    /// recursively updated with prior forecasts. This is a deliberate
    /// simplification: forecast quality degrades over longer horizons since
    /// the lag context never advances.
    ///
    /// Output is grouped by category (ascending by name) and ordered by
    /// timestamp within each category.
    pub fn forecast(&self, horizon_hours: u32) -> Vec<ForecastPoint> {
        let mut points = Vec::with_capacity(self.models.len() * horizon_hours as usize);

        for (category, entry) in &self.models {
            for h in 1..=i64::from(horizon_hours) {
                let timestamp = self.last_timestamp + Duration::hours(h);
                let hour = timestamp.hour();
                let (hour_sin, hour_cos) = encode_hour(hour);
                let (day_sin, day_cos) =
                    encode_day_of_week(timestamp.weekday().num_days_from_monday());

                let features = [
                    hour_sin,
                    hour_cos,
                    day_sin,
                    day_cos,
                    entry.demand_lag_1,
                    entry.demand_lag_2,
                    entry.demand_ma_3,
                ];
                let predicted = entry
                    .model
                    .predict(&entry.scaler.transform(&features))
                    .max(0.0);

                points.push(ForecastPoint {
                    timestamp,
                    hour,
                    category: category.clone(),
                    predicted_demand: predicted,
                });
            }
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DemandRecord;
    use crate::features::build_features;
    use chrono::TimeZone;

    fn record(category: &str, hour_offset: i64, demand: f64) -> DemandRecord {
        DemandRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()
                + Duration::hours(hour_offset),
            store_id: "DS-01".to_string(),
            category: category.to_string(),
            demand_quantity: demand,
            stock_available: 100.0,
            orders_fulfilled: 10,
            orders_cancelled: 0,
            delivery_time_minutes: 12.0,
            csat_score: 4.5,
        }
    }

    /// 48 hours of sinusoidal demand, never zero.
    fn sinusoidal_records(category: &str) -> Vec<DemandRecord> {
        (0..48)
            .map(|h| {
                let demand =
                    20.0 + 8.0 * (2.0 * std::f64::consts::PI * (h % 24) as f64 / 24.0).sin();
                record(category, h, demand)
            })
            .collect()
    }

    #[test]
    fn train_produces_finite_held_out_metrics() {
        let rows = build_features(&sinusoidal_records("Dairy")).unwrap();
        let outcome = DemandForecaster::train(&rows).unwrap();

        let perf = &outcome.performance["Dairy"];
        assert!(perf.mae.is_finite() && perf.mae >= 0.0);
        assert!(perf.rmse.is_finite() && perf.rmse >= 0.0);
        let mape = perf.mape.expect("no zeros in actuals");
        assert!(mape.is_finite() && mape >= 0.0);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn small_category_is_skipped_not_fatal() {
        let mut records = sinusoidal_records("Dairy");
        records.push(record("Exotic", 0, 3.0));
        records.push(record("Exotic", 1, 4.0));

        let rows = build_features(&records).unwrap();
        let outcome = DemandForecaster::train(&rows).unwrap();

        assert!(outcome.models.contains("Dairy"));
        assert!(!outcome.models.contains("Exotic"));
        assert_eq!(
            outcome.skipped,
            vec![SkippedCategory {
                category: "Exotic".to_string(),
                rows: 2
            }]
        );
        assert!(!outcome.performance.contains_key("Exotic"));
    }

    #[test]
    fn predict_is_never_negative() {
        // Steeply falling demand pushes the raw linear extrapolation negative
        let records: Vec<_> = (0..20)
            .map(|h| record("Dairy", h, (100.0 - 40.0 * h as f64).max(0.1)))
            .collect();
        let rows = build_features(&records).unwrap();
        let outcome = DemandForecaster::train(&rows).unwrap();

        // Extreme lag context well below anything observed
        let features = [0.0, 1.0, 0.0, 1.0, -500.0, -500.0, -500.0];
        let pred = outcome.models.predict("Dairy", &features).unwrap();
        assert!(pred >= 0.0);

        for point in outcome.models.forecast(24) {
            assert!(point.predicted_demand >= 0.0);
        }
    }

    #[test]
    fn predict_unmodeled_category_requires_fit() {
        let rows = build_features(&sinusoidal_records("Dairy")).unwrap();
        let outcome = DemandForecaster::train(&rows).unwrap();

        let features = [0.0; FEATURE_COUNT];
        assert_eq!(
            outcome.models.predict("Snacks", &features),
            Err(ReplenishError::FitRequired)
        );
    }

    #[test]
    fn forecast_covers_horizon_in_timestamp_order() {
        let rows = build_features(&sinusoidal_records("Dairy")).unwrap();
        let outcome = DemandForecaster::train(&rows).unwrap();
        let last = outcome.models.last_timestamp();

        let points = outcome.models.forecast(24);
        assert_eq!(points.len(), 24);
        assert_eq!(points[0].timestamp, last + Duration::hours(1));
        assert_eq!(points[23].timestamp, last + Duration::hours(24));
        for pair in points.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
        assert_eq!(points[0].hour, points[0].timestamp.hour());
    }

    #[test]
    fn forecast_is_grouped_by_category() {
        let mut records = sinusoidal_records("Dairy");
        records.extend(sinusoidal_records("Snacks"));

        let rows = build_features(&records).unwrap();
        let outcome = DemandForecaster::train(&rows).unwrap();

        let points = outcome.models.forecast(12);
        assert_eq!(points.len(), 24);
        // BTreeMap iteration: Dairy block first, then Snacks
        assert!(points[..12].iter().all(|p| p.category == "Dairy"));
        assert!(points[12..].iter().all(|p| p.category == "Snacks"));
    }

    #[test]
    fn train_empty_features_is_fatal() {
        assert_eq!(
            DemandForecaster::train(&[]).map(|_| ()),
            Err(ReplenishError::EmptyTable("features"))
        );
    }
}
