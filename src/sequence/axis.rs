//! Discretized parameter axes
//!
//! Values are derived as `start + i * step` from an integer counter and
//! never by repeated addition, so bucket boundaries cannot drift along the
//! axis. Lookups invert this with `round((value - start) / step)`.

use crate::error::{DynamicsError, Result};

/// Half-open axis `[start, start + len * step)` with a fixed step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    name: &'static str,
    start: f64,
    step: f64,
    len: usize,
}

impl Axis {
    /// Largest number of cells a single axis may hold
    pub const MAX_CELLS: usize = u32::MAX as usize;

    /// Axis covering `[start, end)` in increments of `step`
    ///
    /// The number of cells is `round((end - start) / step)`.
    pub fn new(name: &'static str, start: f64, end: f64, step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(DynamicsError::InvalidAxis(format!("{}: step must be positive, got {}", name, step)));
        }
        if !(start.is_finite() && end.is_finite() && end > start) {
            return Err(DynamicsError::InvalidAxis(format!(
                "{}: empty range [{}, {})",
                name, start, end
            )));
        }
        let cells = ((end - start) / step).round();
        if !cells.is_finite() || cells > Self::MAX_CELLS as f64 {
            return Err(DynamicsError::InvalidAxis(format!(
                "{}: step {} gives {} cells over [{}, {}), limit is {}",
                name, step, cells, start, end, Self::MAX_CELLS
            )));
        }
        let len = cells as usize;
        if len == 0 {
            return Err(DynamicsError::InvalidAxis(format!(
                "{}: step {} larger than range [{}, {})",
                name, step, start, end
            )));
        }
        Ok(Self { name, start, step, len })
    }

    /// Degenerate axis holding the single value `value`
    pub fn point(name: &'static str, value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(DynamicsError::InvalidAxis(format!("{}: non-finite value {}", name, value)));
        }
        Ok(Self { name, start: value, step: 1.0, len: 1 })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Real value of cell `index`
    pub fn value(&self, index: usize) -> f64 {
        self.start + index as f64 * self.step
    }

    /// All cell values in order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.value(i))
    }

    /// Cell index of `value`; never clamped
    pub fn index_of(&self, value: f64) -> Result<usize> {
        let index = ((value - self.start) / self.step).round();
        if index.is_finite() && index >= 0.0 && (index as usize) < self.len {
            Ok(index as usize)
        } else {
            Err(DynamicsError::IndexOutOfRange {
                axis: self.name,
                value,
                index: if index.is_finite() { index as i64 } else { i64::MAX },
                len: self.len,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_lengths() {
        assert_eq!(Axis::new("r", 0.0, 4.0, 0.001).unwrap().len(), 4000);
        assert_eq!(Axis::new("x0", 0.0, 1.0, 0.01).unwrap().len(), 100);
    }

    #[test]
    fn test_axis_values_do_not_drift() {
        let axis = Axis::new("r", 0.0, 4.0, 0.001).unwrap();
        for i in [0usize, 1, 999, 2000, 3200, 3999] {
            assert_eq!(axis.index_of(axis.value(i)).unwrap(), i);
        }
        assert_eq!(axis.index_of(3.2).unwrap(), 3200);
        assert_eq!(axis.index_of(3.2004).unwrap(), 3200);
    }

    #[test]
    fn test_axis_out_of_range_is_not_clamped() {
        let axis = Axis::new("x0", 0.0, 1.0, 0.01).unwrap();
        assert!(matches!(
            axis.index_of(1.0),
            Err(DynamicsError::IndexOutOfRange { axis: "x0", index: 100, len: 100, .. })
        ));
        assert!(matches!(
            axis.index_of(-0.02),
            Err(DynamicsError::IndexOutOfRange { index: -2, .. })
        ));
        assert!(axis.index_of(f64::NAN).is_err());
    }

    #[test]
    fn test_axis_rejects_bad_steps() {
        assert!(Axis::new("r", 0.0, 4.0, 0.0).is_err());
        assert!(Axis::new("r", 1.0, 1.0, 0.1).is_err());
        assert!(Axis::new("r", 0.0, 0.1, 1.0).is_err());
    }

    #[test]
    fn test_axis_rejects_cell_count_overflow() {
        assert!(matches!(
            Axis::new("r", 0.0, 4.0, 1e-300),
            Err(DynamicsError::InvalidAxis(_))
        ));
        assert!(Axis::new("r", 0.0, 4.0, 1e-10).is_err());
        assert_eq!(Axis::new("r", 0.0, 1.0, 1e-9).unwrap().len(), 1_000_000_000);
    }

    #[test]
    fn test_point_axis() {
        let axis = Axis::point("x0", 0.3).unwrap();
        assert_eq!(axis.len(), 1);
        assert_eq!(axis.index_of(0.3).unwrap(), 0);
        assert!(axis.index_of(1.4).is_err());
    }
}
