//! Error handling and error types for the GPBoost estimator layer.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation
//! failures are reported at the call that violated the contract; failures
//! produced by an engine are passed through unchanged.

use std::io;
use thiserror::Error;

/// Main error type for the estimator layer.
#[derive(Error, Debug)]
pub enum GPBoostError {
    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Dataset-related errors
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// Invalid input parameters or arguments
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Size mismatch between related inputs
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Accessor or prediction used before a successful fit
    #[error("Estimator not fitted: no {attribute} found. Need to call fit beforehand.")]
    NotFitted { attribute: String },

    /// Parameter value of the wrong kind
    #[error("Type mismatch for {parameter}: expected {expected}, got {actual}")]
    TypeMismatch {
        parameter: String,
        expected: String,
        actual: String,
    },

    /// Failure reported by the boosting engine
    #[error("Engine error: {message}")]
    Engine { message: String },

    /// Training-related errors
    #[error("Training error: {message}")]
    Training { message: String },

    /// Prediction errors
    #[error("Prediction error: {message}")]
    Prediction { message: String },

    /// Raised by a training callback to stop boosting
    #[error("Early stopping triggered: {reason}")]
    EarlyStopping { reason: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlDe {
        #[from]
        source: toml::de::Error,
    },

    /// TOML serialization errors
    #[error("TOML serialization error: {source}")]
    TomlSer {
        #[from]
        source: toml::ser::Error,
    },

    /// Polars DataFrame errors
    #[cfg(feature = "polars")]
    #[error("Polars error: {source}")]
    Polars {
        #[from]
        source: polars::error::PolarsError,
    },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results using GPBoostError
pub type Result<T> = std::result::Result<T, GPBoostError>;

impl GPBoostError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        GPBoostError::Config {
            message: message.into(),
        }
    }

    /// Create a dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        GPBoostError::Dataset {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        GPBoostError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        GPBoostError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a not-fitted error naming the missing attribute
    pub fn not_fitted<S: Into<String>>(attribute: S) -> Self {
        GPBoostError::NotFitted {
            attribute: attribute.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch<P, E, A>(parameter: P, expected: E, actual: A) -> Self
    where
        P: Into<String>,
        E: Into<String>,
        A: Into<String>,
    {
        GPBoostError::TypeMismatch {
            parameter: parameter.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an engine error
    pub fn engine<S: Into<String>>(message: S) -> Self {
        GPBoostError::Engine {
            message: message.into(),
        }
    }

    /// Create a training error
    pub fn training<S: Into<String>>(message: S) -> Self {
        GPBoostError::Training {
            message: message.into(),
        }
    }

    /// Create a prediction error
    pub fn prediction<S: Into<String>>(message: S) -> Self {
        GPBoostError::Prediction {
            message: message.into(),
        }
    }

    /// Create an early stopping signal
    pub fn early_stopping<S: Into<String>>(reason: S) -> Self {
        GPBoostError::EarlyStopping {
            reason: reason.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        GPBoostError::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            GPBoostError::Config { .. } => false,
            GPBoostError::Dataset { .. } => false,
            GPBoostError::InvalidParameter { .. } => false,
            GPBoostError::DimensionMismatch { .. } => false,
            GPBoostError::NotFitted { .. } => true,
            GPBoostError::TypeMismatch { .. } => false,
            GPBoostError::Engine { .. } => false,
            GPBoostError::Training { .. } => true,
            GPBoostError::Prediction { .. } => true,
            GPBoostError::EarlyStopping { .. } => true,
            GPBoostError::IO { .. } => false,
            GPBoostError::Json { .. } => false,
            GPBoostError::TomlDe { .. } => false,
            GPBoostError::TomlSer { .. } => false,
            #[cfg(feature = "polars")]
            GPBoostError::Polars { .. } => false,
            GPBoostError::Internal { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            GPBoostError::Config { .. } => "config",
            GPBoostError::Dataset { .. } => "dataset",
            GPBoostError::InvalidParameter { .. } => "invalid_parameter",
            GPBoostError::DimensionMismatch { .. } => "dimension_mismatch",
            GPBoostError::NotFitted { .. } => "not_fitted",
            GPBoostError::TypeMismatch { .. } => "type_mismatch",
            GPBoostError::Engine { .. } => "engine",
            GPBoostError::Training { .. } => "training",
            GPBoostError::Prediction { .. } => "prediction",
            GPBoostError::EarlyStopping { .. } => "early_stopping",
            GPBoostError::IO { .. } => "io",
            GPBoostError::Json { .. } => "json",
            GPBoostError::TomlDe { .. } => "toml",
            GPBoostError::TomlSer { .. } => "toml",
            #[cfg(feature = "polars")]
            GPBoostError::Polars { .. } => "polars",
            GPBoostError::Internal { .. } => "internal",
        }
    }
}

/// Convenience macros for error creation
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::GPBoostError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::GPBoostError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! dataset_error {
    ($msg:expr) => {
        $crate::core::error::GPBoostError::dataset($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::GPBoostError::dataset(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = GPBoostError::config("test configuration error");
        assert_eq!(err.category(), "config");
        assert!(!err.is_recoverable());

        let err = GPBoostError::training("test training error");
        assert_eq!(err.category(), "training");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_macros() {
        let err = config_error!("test error");
        assert!(matches!(err, GPBoostError::Config { .. }));

        let err = dataset_error!("test error with param: {}", 42);
        assert!(matches!(err, GPBoostError::Dataset { .. }));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_not_fitted_names_attribute() {
        let err = GPBoostError::not_fitted("best_score");
        assert_eq!(err.category(), "not_fitted");
        assert!(err.to_string().contains("best_score"));
    }

    #[test]
    fn test_parameter_errors() {
        let err = GPBoostError::invalid_parameter("objective", "4", "should have 2 or 3 arguments");
        assert_eq!(err.category(), "invalid_parameter");
        assert!(!err.is_recoverable());

        let err = GPBoostError::type_mismatch("num_leaves", "integer", "string");
        assert_eq!(err.category(), "type_mismatch");
        assert!(err.to_string().contains("num_leaves"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = GPBoostError::dimension_mismatch("5 features", "3 features");
        assert_eq!(err.category(), "dimension_mismatch");
        let message = err.to_string();
        assert!(message.contains("5 features"));
        assert!(message.contains("3 features"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: GPBoostError = io_err.into();
        assert!(matches!(err, GPBoostError::IO { .. }));
        assert_eq!(err.category(), "io");
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: usize) -> Result<()> {
            ensure!(value > 1, GPBoostError::invalid_parameter("n", value.to_string(), "too small"));
            Ok(())
        }
        assert!(check(2).is_ok());
        assert!(check(1).is_err());
    }
}
