//! Error type for trajectory generation and analysis.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DynamicsError {
    /// A parameter or initial condition lies outside the range the model is
    /// defined on. Raised before any sequence is spawned.
    #[error("{parameter} = {value} is outside the valid domain [{min}, {max}]")]
    OutOfDomain {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The sequence produced NaN or an infinity at `index` and stopped.
    #[error("sequence diverged to a non-finite state at iteration {index}")]
    NumericDivergence { index: usize },

    /// A continuous parameter value resolved to a grid index outside the
    /// constructed extent.
    #[error("{axis} = {value} resolves to index {index}, outside axis of length {len}")]
    IndexOutOfRange {
        axis: &'static str,
        value: f64,
        index: i64,
        len: usize,
    },

    /// A read past the terminal marker, or from a producer that is gone.
    #[error("end of sequence reached after {index} elements")]
    EndOfSequence { index: usize },

    #[error("grid shape mismatch: {0}")]
    GridShape(String),

    #[error("invalid axis: {0}")]
    InvalidAxis(String),

    #[error("producer task failed: {0}")]
    Producer(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DynamicsError>;

/// Reject `value` unless it lies in the closed interval `[min, max]`.
pub(crate) fn check_domain(parameter: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(DynamicsError::OutOfDomain { parameter, value, min, max })
    }
}

/// Reject non-finite values for parameters without a bounded domain.
pub(crate) fn check_finite(parameter: &'static str, value: f64) -> Result<()> {
    check_domain(parameter, value, f64::MIN, f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_bounds_are_inclusive() {
        assert!(check_domain("r", 0.0, 0.0, 4.0).is_ok());
        assert!(check_domain("r", 4.0, 0.0, 4.0).is_ok());
        assert!(matches!(
            check_domain("r", 4.01, 0.0, 4.0),
            Err(DynamicsError::OutOfDomain { parameter: "r", .. })
        ));
    }

    #[test]
    fn test_nan_is_never_in_domain() {
        assert!(check_domain("x0", f64::NAN, 0.0, 1.0).is_err());
        assert!(check_finite("a", f64::INFINITY).is_err());
        assert!(check_finite("a", -12.5).is_ok());
    }
}
