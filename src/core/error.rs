//! Error types for stockseer.

use thiserror::Error;

/// Result type alias for stockseer operations.
pub type Result<T> = std::result::Result<T, SeerError>;

/// Error types for the analytics core.
///
/// Every public computation returns either a value or one of these tagged
/// results. `InsufficientData` is the dominant failure mode and is never
/// folded into a zero value.
#[derive(Error, Debug)]
pub enum SeerError {
    /// Data length mismatch between arrays.
    #[error("Data length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Invalid parameter value.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Not enough samples for a windowed calculation.
    #[error("Insufficient data: need {required} {what}, have {available}")]
    InsufficientData {
        what: &'static str,
        required: usize,
        available: usize,
    },

    /// Inputs are present but the value is not defined for them.
    #[error("Not computable: {reason}")]
    NotComputable { reason: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Division by zero (zero variance, zero drawdown, ...).
    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    /// Configuration could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl SeerError {
    /// Create a length mismatch error.
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an insufficient data error.
    ///
    /// `what` names the unit being counted ("returns", "bars", "prices").
    pub fn insufficient_data(what: &'static str, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            what,
            required,
            available,
        }
    }

    /// Create a not computable error.
    pub fn not_computable(reason: impl Into<String>) -> Self {
        Self::NotComputable {
            reason: reason.into(),
        }
    }

    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a division by zero error.
    pub fn division_by_zero(context: impl Into<String>) -> Self {
        Self::DivisionByZero {
            context: context.into(),
        }
    }

    /// True for the "window not satisfied" family of errors.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}
