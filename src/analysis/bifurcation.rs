//! Bifurcation Detector: period doubling along the r axis
//!
//! For each r cell (the first row is the baseline and skipped) the detector
//! settles the sequence, then reads a window `c3, c2, c1, curr` (oldest
//! first). The newest sample is compared against the samples one, two and
//! three steps back:
//!
//! ```text
//!   Period1 ──|curr-c1|>ε──▶ Period2 ──|curr-c1|,|curr-c2|>ε──▶ Period4
//!   Period4 ──|curr-c1|,|curr-c2|,|curr-c3|>ε──▶ done
//! ```
//!
//! At most one transition fires per r cell. A window of four samples cannot
//! see lag four, so the last transition fires one cell after the 2→4 point
//! and is a coarse marker only.

use tracing::{info, warn};

use super::transient::skip_transient;
use crate::error::{DynamicsError, Result};
use crate::sequence::ParameterGrid;

/// Samples closer than this are treated as equal
pub const BIFURCATION_TOLERANCE: f64 = 1e-4;

/// Elements discarded before the comparison window
pub const SETTLE_DISCARD: usize = 297;

/// Cycle length currently believed to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Period1,
    Period2,
    Period4,
    Done,
}

/// Parameter values at which each doubling was detected
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BifurcationPoints {
    pub one_to_two: Option<f64>,
    pub two_to_four: Option<f64>,
    pub four_to_eight: Option<f64>,
}

/// State machine over successive parameter cells
#[derive(Debug, Clone)]
pub struct BifurcationDetector {
    tolerance: f64,
    settle: usize,
    regime: Regime,
    points: BifurcationPoints,
}

impl BifurcationDetector {
    pub fn new() -> Self {
        Self::with_params(BIFURCATION_TOLERANCE, SETTLE_DISCARD)
    }

    pub fn with_params(tolerance: f64, settle: usize) -> Self {
        Self {
            tolerance,
            settle,
            regime: Regime::Period1,
            points: BifurcationPoints::default(),
        }
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn points(&self) -> BifurcationPoints {
        self.points
    }

    /// Feed the window `[c3, c2, c1, curr]` observed at parameter `r`
    ///
    /// Returns the regime after the update.
    pub fn observe(&mut self, r: f64, window: [f64; 4]) -> Regime {
        let [c3, c2, c1, curr] = window;
        let eps = self.tolerance;
        let lag1 = (curr - c1).abs() > eps;
        let lag2 = (curr - c2).abs() > eps;
        let lag3 = (curr - c3).abs() > eps;

        match self.regime {
            Regime::Period1 if lag1 => {
                info!(r, "period doubling 1 -> 2");
                self.points.one_to_two = Some(r);
                self.regime = Regime::Period2;
            }
            Regime::Period2 if lag1 && lag2 => {
                info!(r, "period doubling 2 -> 4");
                self.points.two_to_four = Some(r);
                self.regime = Regime::Period4;
            }
            Regime::Period4 if lag1 && lag2 && lag3 => {
                info!(r, "period doubling 4 -> 8");
                self.points.four_to_eight = Some(r);
                self.regime = Regime::Done;
            }
            _ => {}
        }
        self.regime
    }

    /// Scan the grid column at initial condition `x0` in increasing r
    ///
    /// Cells whose sequence diverges are skipped.
    pub async fn scan(&mut self, grid: &mut ParameterGrid<f64>, x0: f64) -> Result<BifurcationPoints> {
        let settle = self.settle;
        for (r, seq) in grid.column(x0)?.skip(1) {
            if let Err(e) = skip_transient(seq, settle).await {
                match e {
                    DynamicsError::NumericDivergence { .. } => {
                        warn!(r, "sequence diverged, cell skipped");
                        continue;
                    }
                    other => return Err(other),
                }
            }
            let mut window = [0.0; 4];
            let mut diverged = false;
            for slot in window.iter_mut() {
                match seq.next_value().await {
                    Ok(v) => *slot = v,
                    Err(DynamicsError::NumericDivergence { .. }) => {
                        diverged = true;
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
            if diverged {
                warn!(r, "sequence diverged, cell skipped");
                continue;
            }
            if self.observe(r, window) == Regime::Done {
                break;
            }
        }
        Ok(self.points)
    }
}

impl Default for BifurcationDetector {
    fn default() -> Self {
        Self::new()
    }
}
