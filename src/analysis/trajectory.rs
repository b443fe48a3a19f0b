//! Trajectory Recorder: raw point sets for phase portraits
//!
//! Reads a fixed number of points from a sequence, stopping early (and
//! excluding the non-finite point) if the terminal marker arrives.

use tracing::warn;

use crate::error::Result;
use crate::sequence::{Sample, Sequence};

/// Recorded points of one sequence
#[derive(Debug, Clone)]
pub struct Trajectory<P> {
    pub points: Vec<P>,
    /// Recording stopped on a terminal marker
    pub terminated: bool,
}

impl<P> Trajectory<P> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Record up to `steps` points from `seq`
pub async fn record_trajectory<P: Send + 'static>(seq: &mut Sequence<P>, steps: usize) -> Result<Trajectory<P>> {
    let mut points = Vec::with_capacity(steps);
    for _ in 0..steps {
        match seq.next().await? {
            Sample::Value(p) => points.push(p),
            Sample::Terminal(_) => {
                warn!(recorded = points.len(), "trajectory stopped at non-finite state");
                return Ok(Trajectory { points, terminated: true });
            }
        }
    }
    Ok(Trajectory { points, terminated: false })
}

/// Record two sequences in lockstep for `steps` iterations
///
/// Both reads of an iteration are issued before the next; a sequence that
/// terminates simply stops growing while the other continues.
pub async fn record_pair<P: Send + 'static>(
    first: &mut Sequence<P>,
    second: &mut Sequence<P>,
    steps: usize,
) -> Result<(Trajectory<P>, Trajectory<P>)> {
    let mut a = Trajectory { points: Vec::with_capacity(steps), terminated: false };
    let mut b = Trajectory { points: Vec::with_capacity(steps), terminated: false };

    for _ in 0..steps {
        if a.terminated && b.terminated {
            break;
        }
        for (seq, traj) in [(&mut *first, &mut a), (&mut *second, &mut b)] {
            if traj.terminated {
                continue;
            }
            match seq.next().await? {
                Sample::Value(p) => traj.points.push(p),
                Sample::Terminal(_) => traj.terminated = true,
            }
        }
    }
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{DuffingOscillator, DuffingState, RosslerFlow, RosslerPoint};

    #[tokio::test]
    async fn test_rossler_baseline_stays_finite() {
        let flow = RosslerFlow::new(0.2, 0.2, 5.7).unwrap();
        let mut seq = Sequence::spawn(flow, RosslerPoint::new(-1.0, 0.0, 0.0)).unwrap();
        let traj = record_trajectory(&mut seq, 100_000).await.unwrap();

        assert_eq!(traj.len(), 100_000);
        assert!(!traj.terminated);
        assert_eq!(traj.points[0], RosslerPoint::new(-1.0, 0.0, 0.0));
    }

    #[tokio::test]
    async fn test_diverging_flow_stops_recording() {
        let flow = RosslerFlow::new(0.2, 0.2, 5.7).unwrap();
        let mut seq = Sequence::spawn(flow, RosslerPoint::new(1e300, 1e300, 1e300)).unwrap();
        let traj = record_trajectory(&mut seq, 1000).await.unwrap();

        assert!(traj.terminated);
        assert!(traj.len() < 1000);
        assert!(traj.points.iter().all(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite()));
        assert!(seq.next().await.is_err());
    }

    #[tokio::test]
    async fn test_duffing_pair_in_lockstep() {
        let low = DuffingOscillator::new(0.24, 1000).unwrap();
        let high = DuffingOscillator::new(0.35, 1000).unwrap();
        let mut a = Sequence::spawn(low, DuffingState::new(0.0, 0.0)).unwrap();
        let mut b = Sequence::spawn(high, DuffingState::new(0.0, 0.0)).unwrap();

        let (ta, tb) = record_pair(&mut a, &mut b, 10_000).await.unwrap();
        assert_eq!(ta.len(), 10_000);
        assert_eq!(tb.len(), 10_000);
        assert_eq!(ta.points[0], tb.points[0]);
        assert_ne!(ta.points[9_999], tb.points[9_999]);
    }
}
