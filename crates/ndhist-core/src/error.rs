//! Error types for histogram construction and manipulation
//!
//! Provides a unified error type for all ndhist crates. Out-of-range fills are
//! not errors: they are reported through the fill outcome and counted as
//! underflow/overflow by the histogram itself.

use thiserror::Error;

/// Core error type for histogram operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a constructor or operation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Coordinate or bin-index slice does not match the histogram dimension
    #[error("Dimension mismatch: expected {expected} coordinates, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Axis whose lower and upper edges do not describe a non-empty range
    #[error("Degenerate axis {axis}: range [{min}, {max}] is empty or not finite")]
    DegenerateAxis { axis: usize, min: f64, max: f64 },

    /// Two histograms whose binning differs where identical binning is required
    #[error("Incompatible binning: {0}")]
    IncompatibleBinning(String),

    /// Two profiles that filter values with different accept-ranges
    #[error("Incompatible value range: {0}")]
    IncompatibleValueRange(String),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a zero bin count on an axis
    pub fn zero_bins(axis: usize) -> Self {
        Self::InvalidParameter(format!("Axis {axis} must have at least one bin"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for a dimension index past the histogram dimension
    pub fn dimension_out_of_range(dim: usize, dimension: usize) -> Self {
        Self::InvalidParameter(format!(
            "Dimension {dim} is out of range for a {dimension}-dimensional histogram"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidInput(format!("{context} contains NaN or infinite values"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("bins must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: bins must be positive");

        let err = Error::DimensionMismatch { expected: 2, actual: 3 };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected 2 coordinates, got 3"
        );

        let err = Error::DegenerateAxis { axis: 1, min: 2.0, max: 2.0 };
        assert_eq!(
            err.to_string(),
            "Degenerate axis 1: range [2, 2] is empty or not finite"
        );

        let err = Error::IncompatibleBinning("axis 0 differs".to_string());
        assert_eq!(err.to_string(), "Incompatible binning: axis 0 differs");
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::zero_bins(0);
        assert_eq!(err.to_string(), "Invalid parameter: Axis 0 must have at least one bin");

        let err = Error::size_mismatch(3, 2, "maximum edges");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in maximum edges: expected 3, got 2"
        );

        let err = Error::dimension_out_of_range(4, 2);
        assert!(err.to_string().contains("Dimension 4"));

        let err = Error::non_finite("bin edges");
        assert_eq!(
            err.to_string(),
            "Invalid input: bin edges contains NaN or infinite values"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("custom error message").into();
        match err {
            Error::Other(_) => assert!(err.to_string().contains("custom error message")),
            _ => panic!("Wrong error type"),
        }
    }
}
