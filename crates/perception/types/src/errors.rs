//! Configuration errors
//!
//! Resolution and store operations absorb bad input; only configuration
//! mistakes surface as errors, at construction time.

use crate::detection::DetectionState;
use thiserror::Error;

/// Errors raised while validating host configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A radius or range is negative or not finite
    #[error("Invalid radius for '{field}': {value} (must be finite and non-negative)")]
    InvalidRadius {
        /// Offending field
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// An upgrade table moves a state toward less certainty
    #[error("Upgrade table '{table}' is not monotonic: {from} -> {to}")]
    NonMonotonicUpgrade {
        table: &'static str,
        from: DetectionState,
        to: DetectionState,
    },

    /// The critical table upgrades less far than the plain table
    #[error("Critical upgrade of {from} ({critical}) falls short of the plain upgrade ({plain})")]
    CriticalBelowSuccess {
        from: DetectionState,
        plain: DetectionState,
        critical: DetectionState,
    },

    /// A duration that must be positive is zero
    #[error("Duration '{field}' must be greater than 0")]
    ZeroDuration { field: &'static str },
}

/// Result type for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidRadius {
            field: "noise_radius",
            value: -1.0,
        };
        assert!(err.to_string().contains("noise_radius"));

        let err = ConfigError::NonMonotonicUpgrade {
            table: "success",
            from: DetectionState::Hidden,
            to: DetectionState::Suspicious,
        };
        assert!(err.to_string().contains("hidden -> suspicious"));
    }
}
