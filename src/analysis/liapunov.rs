//! Liapunov Estimator
//!
//! For a one-dimensional map f the exponent along a trajectory is
//!
//!   λ = (1/n) Σ ln|f'(xᵢ)|
//!
//! λ > 0 signals sensitive dependence on initial conditions; λ ≤ 0 a
//! stable fixed point or cycle. A superstable point (f'(x) = 0) gives -∞.

use tracing::{info, warn};

use super::transient::skip_transient;
use crate::error::{DynamicsError, Result};
use crate::sequence::{ParameterGrid, Sequence};
use crate::systems::Differentiable;

/// Exponent at one parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiapunovPoint {
    pub parameter: f64,
    pub exponent: f64,
}

/// Exponents in increasing parameter order, for plotting as a line
#[derive(Debug, Clone, Default)]
pub struct LiapunovCurve {
    pub points: Vec<LiapunovPoint>,
}

impl LiapunovCurve {
    /// First parameter whose exponent is positive (onset of chaos)
    pub fn first_positive(&self) -> Option<f64> {
        self.points.iter().find(|p| p.exponent > 0.0).map(|p| p.parameter)
    }

    /// Exponent at the cell nearest `parameter`
    pub fn exponent_at(&self, parameter: f64) -> Option<f64> {
        self.points
            .iter()
            .min_by(|a, b| {
                (a.parameter - parameter)
                    .abs()
                    .total_cmp(&(b.parameter - parameter).abs())
            })
            .map(|p| p.exponent)
    }
}

/// Average of `ln|f'(x)|` over a fixed number of samples
#[derive(Debug, Clone, Copy)]
pub struct LiapunovEstimator {
    /// Elements dropped before accumulating
    pub alignment: usize,
    /// Samples accumulated per exponent
    pub samples: usize,
}

impl LiapunovEstimator {
    pub fn new(samples: usize) -> Self {
        Self { alignment: 1, samples }
    }

    /// Exponent of `kernel` along `seq`
    pub async fn estimate<K: Differentiable>(&self, kernel: &K, seq: &mut Sequence<f64>) -> Result<f64> {
        if self.samples == 0 {
            return Err(DynamicsError::Config("Liapunov sample count must be positive".into()));
        }
        skip_transient(seq, self.alignment).await?;

        let mut sum = 0.0;
        for _ in 0..self.samples {
            let x = seq.next_value().await?;
            sum += kernel.derivative(x).abs().ln();
        }
        Ok(sum / self.samples as f64)
    }

    /// One exponent per row of the grid column at `x0`
    ///
    /// `kernel_at` rebuilds the kernel for a row value so its derivative
    /// can be evaluated. Diverged cells are left out of the curve.
    pub async fn scan<K, F>(&self, grid: &mut ParameterGrid<f64>, x0: f64, kernel_at: F) -> Result<LiapunovCurve>
    where
        K: Differentiable,
        F: Fn(f64) -> Result<K>,
    {
        let mut curve = LiapunovCurve::default();
        for (r, seq) in grid.column(x0)? {
            let kernel = kernel_at(r)?;
            match self.estimate(&kernel, seq).await {
                Ok(exponent) => curve.points.push(LiapunovPoint { parameter: r, exponent }),
                Err(DynamicsError::NumericDivergence { index }) => {
                    warn!(r, index, "sequence diverged, no exponent");
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            cells = curve.points.len(),
            onset = ?curve.first_positive(),
            "Liapunov scan complete"
        );
        Ok(curve)
    }
}

impl Default for LiapunovEstimator {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::LogisticMap;

    async fn exponent(r: f64) -> f64 {
        let (map, x0) = LogisticMap::cell(r, 0.3).unwrap();
        let mut seq = Sequence::spawn(map, x0).unwrap();
        LiapunovEstimator::default().estimate(&map, &mut seq).await.unwrap()
    }

    #[tokio::test]
    async fn test_stable_regimes_are_negative() {
        assert!(exponent(0.5).await < 0.0);
        assert!(exponent(2.5).await < 0.0);
        assert!(exponent(3.2).await < 0.0);
    }

    #[tokio::test]
    async fn test_chaotic_regime_is_positive() {
        let lambda = exponent(3.9).await;
        assert!(lambda > 0.3 && lambda < 0.7, "lambda = {}", lambda);
    }

    #[tokio::test]
    async fn test_zero_samples_rejected() {
        let (map, x0) = LogisticMap::cell(3.0, 0.3).unwrap();
        let mut seq = Sequence::spawn(map, x0).unwrap();
        let estimator = LiapunovEstimator { alignment: 1, samples: 0 };
        assert!(estimator.estimate(&map, &mut seq).await.is_err());
    }

    #[test]
    fn test_curve_queries() {
        let curve = LiapunovCurve {
            points: vec![
                LiapunovPoint { parameter: 3.5, exponent: -0.8 },
                LiapunovPoint { parameter: 3.6, exponent: 0.17 },
                LiapunovPoint { parameter: 3.7, exponent: 0.35 },
            ],
        };
        assert_eq!(curve.first_positive(), Some(3.6));
        assert_eq!(curve.exponent_at(3.52), Some(-0.8));
    }
}
