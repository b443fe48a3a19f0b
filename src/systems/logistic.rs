//! Logistic Map: Period-Doubling Route to Chaos
//!
//!   x' = r·x·(1 - x)
//!
//! For x ∈ [0, 1] the map stays in [0, 1] whenever r ∈ [0, 4].
//!
//! ## Regimes
//!
//! - r ≤ 1: Collapse to the fixed point 0
//! - 1 < r ≤ 3: Fixed point 1 - 1/r
//! - 3 < r < 1 + √6: Stable two-cycle
//! - r ≈ 3.5699: Accumulation of period doublings, onset of chaos

use crate::error::{check_domain, Result};
use super::traits::{Differentiable, RecurrenceKernel};

/// Logistic map with a fixed growth rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticMap {
    r: f64,
}

impl LogisticMap {
    /// Largest growth rate for which [0, 1] is invariant
    pub const R_MAX: f64 = 4.0;

    /// Create map with growth rate `r`, rejecting r outside [0, 4]
    pub fn new(r: f64) -> Result<Self> {
        check_domain("r", r, 0.0, Self::R_MAX)?;
        Ok(Self { r })
    }

    /// Validated kernel and initial state for one (r, x0) grid cell
    pub fn cell(r: f64, x0: f64) -> Result<(Self, f64)> {
        let map = Self::new(r)?;
        check_domain("x0", x0, 0.0, 1.0)?;
        Ok((map, x0))
    }

    /// Growth rate
    pub fn r(&self) -> f64 {
        self.r
    }
}

impl RecurrenceKernel for LogisticMap {
    type State = f64;
    type Point = f64;

    fn advance(&self, x: &f64) -> f64 {
        self.r * x * (1.0 - x)
    }

    fn observe(&self, x: &f64) -> f64 {
        *x
    }

    fn is_finite(&self, x: &f64) -> bool {
        x.is_finite()
    }

    fn name(&self) -> &'static str {
        "logistic"
    }
}

impl Differentiable for LogisticMap {
    fn derivative(&self, x: f64) -> f64 {
        self.r - 2.0 * self.r * x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DynamicsError;

    #[test]
    fn test_logistic_rejects_out_of_domain() {
        assert!(matches!(
            LogisticMap::new(4.5),
            Err(DynamicsError::OutOfDomain { parameter: "r", .. })
        ));
        assert!(matches!(
            LogisticMap::cell(3.0, 1.2),
            Err(DynamicsError::OutOfDomain { parameter: "x0", .. })
        ));
    }

    #[test]
    fn test_logistic_fixed_point() {
        let map = LogisticMap::new(2.8).unwrap();
        let fixed = 1.0 - 1.0 / 2.8;
        assert!((map.advance(&fixed) - fixed).abs() < 1e-15);
    }

    #[test]
    fn test_logistic_derivative() {
        let map = LogisticMap::new(3.0).unwrap();
        assert_eq!(map.derivative(0.5), 0.0);
        assert_eq!(map.derivative(0.0), 3.0);
    }

    #[test]
    fn test_logistic_deterministic() {
        let map = LogisticMap::new(3.9).unwrap();
        let run = || {
            let mut x = 0.3;
            for _ in 0..1000 {
                x = map.advance(&x);
            }
            x
        };
        assert_eq!(run().to_bits(), run().to_bits());
    }
}
