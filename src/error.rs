//! Error types for the replenishment engine.

use thiserror::Error;

/// Result type alias for replenishment operations.
pub type Result<T> = std::result::Result<T, ReplenishError>;

/// Errors that can occur during replenishment analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplenishError {
    /// An input table is empty. The only run-aborting condition.
    #[error("empty input table: {0}")]
    EmptyTable(&'static str),

    /// A category has no demand records to build features from.
    #[error("no demand records for category '{category}'")]
    InsufficientData { category: String },

    /// Inventory references a category absent from the demand statistics.
    #[error("category '{category}' missing from demand statistics (store {store_id}, product {product_name})")]
    UnknownCategory {
        store_id: String,
        product_name: String,
        category: String,
    },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ReplenishError::EmptyTable("demand");
        assert_eq!(err.to_string(), "empty input table: demand");

        let err = ReplenishError::InsufficientData {
            category: "Dairy".to_string(),
        };
        assert_eq!(err.to_string(), "no demand records for category 'Dairy'");

        let err = ReplenishError::UnknownCategory {
            store_id: "DS-01".to_string(),
            product_name: "Milk 1L".to_string(),
            category: "Dairy".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "category 'Dairy' missing from demand statistics (store DS-01, product Milk 1L)"
        );

        let err = ReplenishError::DimensionMismatch {
            expected: 7,
            got: 6,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 7, got 6");

        let err = ReplenishError::FitRequired;
        assert_eq!(err.to_string(), "model must be fitted before prediction");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ReplenishError::EmptyTable("inventory");
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
