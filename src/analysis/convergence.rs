//! Convergence Classifier
//!
//! Compares post-transient samples of a scalar sequence against a known
//! attractor. For the logistic map the attractor is known analytically up
//! to the first period doubling:
//!
//! - r ≤ 1: x* = 0
//! - 1 < r ≤ 3: x* = 1 - 1/r
//! - 3 < r < 1 + √6: x± = ((r + 1) ± √((r - 3)(r + 1))) / 2r
//!
//! Beyond that no target is known and samples are only observed.

use tracing::warn;

use crate::error::{DynamicsError, Result};
use crate::sequence::{Sample, Sequence};

/// Asymptotic target of a sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Attractor {
    FixedPoint(f64),
    /// Values visited by a periodic orbit
    Cycle(Vec<f64>),
    Unknown,
}

impl Attractor {
    /// Analytic attractor of the logistic map at growth rate `r`
    pub fn for_logistic(r: f64) -> Self {
        if !(0.0..=4.0).contains(&r) {
            Attractor::Unknown
        } else if r <= 1.0 {
            Attractor::FixedPoint(0.0)
        } else if r <= 3.0 {
            Attractor::FixedPoint(1.0 - 1.0 / r)
        } else if r < 1.0 + 6.0_f64.sqrt() {
            let root = ((r - 3.0) * (r + 1.0)).sqrt();
            Attractor::Cycle(vec![(r + 1.0 - root) / (2.0 * r), (r + 1.0 + root) / (2.0 * r)])
        } else {
            Attractor::Unknown
        }
    }

    /// Candidate target closest to `value`; the earlier candidate wins ties
    pub fn nearest(&self, value: f64) -> Option<f64> {
        match self {
            Attractor::FixedPoint(x) => Some(*x),
            Attractor::Cycle(points) => points
                .iter()
                .copied()
                .fold(None, |best: Option<f64>, p| match best {
                    Some(b) if (b - value).abs() <= (p - value).abs() => Some(b),
                    _ => Some(p),
                }),
            Attractor::Unknown => None,
        }
    }
}

/// One observed sample: (iteration, value, target, |value - target|)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceRecord {
    /// Index of the sample within its sequence
    pub iteration: usize,
    pub value: f64,
    pub target: Option<f64>,
    pub deviation: Option<f64>,
}

/// Samples read by [`classify`]
#[derive(Debug, Clone)]
pub struct ConvergenceReport {
    pub attractor: Attractor,
    pub records: Vec<ConvergenceRecord>,
    /// The sequence ended on a terminal marker before all samples were read
    pub terminated: bool,
}

impl ConvergenceReport {
    /// First sample within `tolerance` of its target
    pub fn first_within(&self, tolerance: f64) -> Option<&ConvergenceRecord> {
        self.records
            .iter()
            .find(|rec| rec.deviation.map_or(false, |d| d < tolerance))
    }

    /// Whether every sample is within `tolerance`; false when there is no
    /// target or nothing was read
    pub fn settled_within(&self, tolerance: f64) -> bool {
        !self.records.is_empty()
            && self
                .records
                .iter()
                .all(|rec| rec.deviation.map_or(false, |d| d < tolerance))
    }

    /// Largest deviation observed
    pub fn max_deviation(&self) -> Option<f64> {
        self.records
            .iter()
            .filter_map(|rec| rec.deviation)
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.max(d))))
    }
}

/// Read `samples` elements one at a time and compare each to `attractor`
pub async fn classify(
    seq: &mut Sequence<f64>,
    attractor: &Attractor,
    samples: usize,
) -> Result<ConvergenceReport> {
    let mut records = Vec::with_capacity(samples);
    let mut terminated = false;

    for _ in 0..samples {
        let iteration = seq.position();
        let value = match seq.next().await {
            Ok(Sample::Value(v)) => v,
            Ok(Sample::Terminal(_)) | Err(DynamicsError::EndOfSequence { .. }) => {
                warn!(iteration, "sequence ended during convergence check");
                terminated = true;
                break;
            }
            Err(e) => return Err(e),
        };
        let target = attractor.nearest(value);
        records.push(ConvergenceRecord {
            iteration,
            value,
            target,
            deviation: target.map(|t| (value - t).abs()),
        });
    }

    Ok(ConvergenceReport {
        attractor: attractor.clone(),
        records,
        terminated,
    })
}
