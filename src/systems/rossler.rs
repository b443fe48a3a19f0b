//! Rössler Flow: Single-Scroll Chaotic Attractor
//!
//!   dx/dt = -(y + z)
//!   dy/dt = x + a·y
//!   dz/dt = b + z·(x - c)
//!
//! integrated with an explicit Euler step h = 1/1000. The classic choice
//! a = b = 0.2, c = 5.7 gives a chaotic band; large a or c can blow the
//! explicit scheme up, which the producer reports as a terminal state.

use crate::error::{check_finite, Result};
use super::traits::{PhaseDistance, RecurrenceKernel};

/// Point in the Rössler phase space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosslerPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RosslerPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar projections (x, y), (x, z), (y, z)
    pub fn projections(&self) -> [(f64, f64); 3] {
        [(self.x, self.y), (self.x, self.z), (self.y, self.z)]
    }
}

impl PhaseDistance for RosslerPoint {
    fn distance(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }
}

/// Rössler system with fixed parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosslerFlow {
    a: f64,
    b: f64,
    c: f64,
    h: f64,
}

impl RosslerFlow {
    /// Integration step, 1/1000 of a time unit
    pub const STEP: f64 = 1.0 / 1000.0;

    pub fn new(a: f64, b: f64, c: f64) -> Result<Self> {
        check_finite("a", a)?;
        check_finite("b", b)?;
        check_finite("c", c)?;
        Ok(Self { a, b, c, h: Self::STEP })
    }

    /// Parameters (a, b, c)
    pub fn parameters(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }
}

impl RecurrenceKernel for RosslerFlow {
    type State = RosslerPoint;
    type Point = RosslerPoint;

    fn advance(&self, p: &RosslerPoint) -> RosslerPoint {
        let h = self.h;
        RosslerPoint {
            x: p.x - (p.y + p.z) * h,
            y: p.y + (p.x + self.a * p.y) * h,
            z: p.z + (self.b + p.z * (p.x - self.c)) * h,
        }
    }

    fn observe(&self, p: &RosslerPoint) -> RosslerPoint {
        *p
    }

    fn is_finite(&self, p: &RosslerPoint) -> bool {
        p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
    }

    fn name(&self) -> &'static str {
        "rossler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rossler_classic_parameters_stay_finite() {
        let flow = RosslerFlow::new(0.2, 0.2, 5.7).unwrap();
        let mut p = RosslerPoint::new(-1.0, 0.0, 0.0);
        for step in 0..100_000 {
            p = flow.advance(&p);
            assert!(flow.is_finite(&p), "blew up at step {}", step);
        }
    }

    #[test]
    fn test_rossler_single_step() {
        let flow = RosslerFlow::new(0.2, 0.2, 5.7).unwrap();
        let p = flow.advance(&RosslerPoint::new(-1.0, 0.0, 0.0));
        assert_eq!(p.x, -1.0);
        assert!((p.y - (-0.001)).abs() < 1e-15);
        assert!((p.z - 0.0002).abs() < 1e-15);
    }

    #[test]
    fn test_rossler_projections() {
        let [xy, xz, yz] = RosslerPoint::new(1.0, 2.0, 3.0).projections();
        assert_eq!(xy, (1.0, 2.0));
        assert_eq!(xz, (1.0, 3.0));
        assert_eq!(yz, (2.0, 3.0));
    }
}
