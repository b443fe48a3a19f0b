//! Forced Duffing Oscillator (double well, explicit Euler)
//!
//!   dx/dt = y
//!   dy/dt = F·cos(t) - 0.5·y + x - x³
//!
//! discretized with a fixed step dt:
//!
//!   x' = dt·y + x
//!   y' = dt·(F·cos(t) - 0.5·y + x - x³) + y
//!   t' = t + dt
//!
//! ## Behaviour
//!
//! - F = 0: Damped motion into one of the wells at x = ±1
//! - F ≈ 0.24: Periodic orbit confined to one well
//! - F ≈ 0.35: Cross-well, chaotic motion
//!
//! The forcing phase t is carried in the state but consumers only see the
//! (x, y) phase point.

use crate::error::{check_finite, DynamicsError, Result};
use super::traits::{PhaseDistance, RecurrenceKernel};

/// Linear damping coefficient
const DAMPING: f64 = 0.5;

/// Internal state: phase point plus forcing clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuffingState {
    x: f64,
    y: f64,
    t: f64,
}

impl DuffingState {
    /// State at t = 0
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, t: 0.0 }
    }
}

/// Observable phase point (x, dx/dt)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhasePoint {
    pub x: f64,
    pub y: f64,
}

impl PhaseDistance for PhasePoint {
    fn distance(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Duffing oscillator with fixed forcing amplitude and time step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuffingOscillator {
    /// Forcing amplitude F
    forcing: f64,
    /// Integration timestep
    dt: f64,
}

impl DuffingOscillator {
    /// Create oscillator with `steps_per_second` integration steps per
    /// unit of time (dt = 1 / steps_per_second)
    pub fn new(forcing: f64, steps_per_second: u32) -> Result<Self> {
        check_finite("F", forcing)?;
        if steps_per_second == 0 {
            return Err(DynamicsError::OutOfDomain {
                parameter: "steps_per_second",
                value: 0.0,
                min: 1.0,
                max: u32::MAX as f64,
            });
        }
        Ok(Self {
            forcing,
            dt: 1.0 / steps_per_second as f64,
        })
    }

    pub fn forcing(&self) -> f64 {
        self.forcing
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }
}

impl RecurrenceKernel for DuffingOscillator {
    type State = DuffingState;
    type Point = PhasePoint;

    fn advance(&self, s: &DuffingState) -> DuffingState {
        let dt = self.dt;
        DuffingState {
            x: dt * s.y + s.x,
            y: dt * (self.forcing * s.t.cos() - DAMPING * s.y + s.x - s.x.powi(3)) + s.y,
            t: s.t + dt,
        }
    }

    fn observe(&self, s: &DuffingState) -> PhasePoint {
        PhasePoint { x: s.x, y: s.y }
    }

    fn is_finite(&self, s: &DuffingState) -> bool {
        s.x.is_finite() && s.y.is_finite()
    }

    fn name(&self) -> &'static str {
        "duffing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(osc: &DuffingOscillator, mut s: DuffingState, n: usize) -> DuffingState {
        for _ in 0..n {
            s = osc.advance(&s);
        }
        s
    }

    #[test]
    fn test_duffing_unforced_settles_in_well() {
        let osc = DuffingOscillator::new(0.0, 1000).unwrap();
        let end = osc.observe(&run(&osc, DuffingState::new(0.5, 0.0), 100_000));
        assert!((end.x - 1.0).abs() < 1e-6, "x = {}", end.x);
        assert!(end.y.abs() < 1e-6);
    }

    #[test]
    fn test_duffing_origin_is_equilibrium_without_forcing() {
        let osc = DuffingOscillator::new(0.0, 100).unwrap();
        let end = run(&osc, DuffingState::new(0.0, 0.0), 500);
        assert_eq!(osc.observe(&end), PhasePoint { x: 0.0, y: 0.0 });
        assert!((end.t - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_duffing_rejects_zero_resolution() {
        assert!(DuffingOscillator::new(0.24, 0).is_err());
        assert!(DuffingOscillator::new(f64::NAN, 10).is_err());
    }
}
