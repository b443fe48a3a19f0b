//! Transient Skipper

use crate::error::Result;
use crate::sequence::Sequence;

/// Elements discarded before steady-state analysis unless configured
/// otherwise
pub const DEFAULT_TRANSIENT: usize = 300;

/// Read and drop exactly `n` elements from the front of `seq`
///
/// Suspends on each read until the producer supplies it. Meeting the
/// terminal marker inside the transient is reported as `NumericDivergence`.
pub async fn skip_transient<P: Send + 'static>(seq: &mut Sequence<P>, n: usize) -> Result<&mut Sequence<P>> {
    for _ in 0..n {
        seq.next_value().await?;
    }
    Ok(seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DynamicsError;
    use crate::systems::{LogisticMap, RosslerFlow, RosslerPoint};

    #[tokio::test]
    async fn test_skips_exactly_n() {
        let (map, x0) = LogisticMap::cell(2.5, 0.3).unwrap();
        let mut seq = Sequence::spawn(map, x0).unwrap();
        let seq = skip_transient(&mut seq, 7).await.unwrap();
        assert_eq!(seq.position(), 7);

        let mut x = 0.3;
        for _ in 0..7 {
            x = 2.5 * x * (1.0 - x);
        }
        assert_eq!(seq.next_value().await.unwrap(), x);
    }

    #[tokio::test]
    async fn test_divergence_inside_transient_is_reported() {
        // Non-finite initial condition
        let flow = RosslerFlow::new(0.2, 0.2, 5.7).unwrap();
        let mut seq = Sequence::spawn(flow, RosslerPoint::new(f64::INFINITY, 0.0, 0.0)).unwrap();
        assert!(matches!(
            skip_transient(&mut seq, 10).await,
            Err(DynamicsError::NumericDivergence { index: 0 })
        ));
    }
}
