//! Utility functions shared across the engine.

pub mod metrics;
pub mod stats;

pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use stats::{mean, std_dev, variance};
