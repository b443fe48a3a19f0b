//! Divergence Comparator: sensitive dependence on initial conditions
//!
//! Reads two sequences in lockstep (both reads issued before comparing)
//! and reports their separation at every iteration.

use tracing::warn;

use crate::error::{DynamicsError, Result};
use crate::sequence::{Sample, Sequence};
use crate::systems::PhaseDistance;

/// (Xn, Xn', |Xn - Xn'|) at one iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergenceRecord<P> {
    pub iteration: usize,
    pub left: P,
    pub right: P,
    pub separation: f64,
}

/// Compare `left` and `right` for `steps` iterations
///
/// The report ends early when either sequence reaches its terminal marker.
pub async fn compare<P>(
    left: &mut Sequence<P>,
    right: &mut Sequence<P>,
    steps: usize,
) -> Result<Vec<DivergenceRecord<P>>>
where
    P: PhaseDistance + Copy + Send + 'static,
{
    let mut records = Vec::with_capacity(steps);
    for _ in 0..steps {
        let iteration = left.position();
        let a = left.next().await;
        let b = right.next().await;
        let (a, b) = match (a, b) {
            (Ok(Sample::Value(a)), Ok(Sample::Value(b))) => (a, b),
            (Ok(_), Ok(_)) | (Err(DynamicsError::EndOfSequence { .. }), _) | (_, Err(DynamicsError::EndOfSequence { .. })) => {
                warn!(iteration, "sequence ended, divergence report truncated");
                break;
            }
            (Err(e), _) | (_, Err(e)) => return Err(e),
        };
        records.push(DivergenceRecord {
            iteration,
            left: a,
            right: b,
            separation: a.distance(&b),
        });
    }
    Ok(records)
}

/// Iteration at which the separation first exceeds `threshold`
pub fn decorrelation_time<P>(records: &[DivergenceRecord<P>], threshold: f64) -> Option<usize> {
    records
        .iter()
        .find(|rec| rec.separation > threshold)
        .map(|rec| rec.iteration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::LogisticMap;

    async fn pair(r: f64, x0: f64, x1: f64) -> (Sequence<f64>, Sequence<f64>) {
        let map = LogisticMap::new(r).unwrap();
        (Sequence::spawn(map, x0).unwrap(), Sequence::spawn(map, x1).unwrap())
    }

    #[tokio::test]
    async fn test_chaotic_neighbours_separate() {
        let (mut a, mut b) = pair(3.9, 0.30, 0.31).await;
        let records = compare(&mut a, &mut b, 100).await.unwrap();

        assert_eq!(records.len(), 100);
        assert!((records[0].separation - 0.01).abs() < 1e-12);
        assert!(decorrelation_time(&records, 0.3).is_some());
    }

    #[tokio::test]
    async fn test_stable_neighbours_converge() {
        let (mut a, mut b) = pair(2.5, 0.30, 0.31).await;
        let records = compare(&mut a, &mut b, 200).await.unwrap();
        assert!(records.last().unwrap().separation < 1e-10);
        assert_eq!(decorrelation_time(&records, 0.3), None);
    }

    #[tokio::test]
    async fn test_records_are_lockstep() {
        let (mut a, mut b) = pair(3.7, 0.2, 0.21).await;
        let records = compare(&mut a, &mut b, 5).await.unwrap();
        for (i, rec) in records.iter().enumerate() {
            assert_eq!(rec.iteration, i);
            assert_eq!(rec.separation, (rec.left - rec.right).abs());
        }
        assert_eq!(a.position(), b.position());
    }
}
