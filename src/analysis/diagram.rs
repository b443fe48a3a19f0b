//! Diagram Sampler: one steady-state point per grid cell
//!
//! Each cell contributes `(row value, value after the transient)`. Cells are
//! flattened row-major with `row * cols + col`, which is a bijection from
//! the grid onto `0..rows * cols`.

use ndarray::Array2;
use tracing::{info, warn};

use super::transient::skip_transient;
use crate::error::{DynamicsError, Result};
use crate::sequence::ParameterGrid;

/// Output slot of cell (row, col) in a grid with `cols` columns
pub fn flat_index(row: usize, col: usize, cols: usize) -> usize {
    row * cols + col
}

/// Sampled point set, one row per grid cell
#[derive(Debug, Clone)]
pub struct BifurcationDiagram {
    /// Shape (rows * cols, 2): column 0 the parameter, column 1 the value.
    /// Cells whose sequence diverged hold NaN in column 1.
    pub points: Array2<f64>,
    /// Number of diverged cells
    pub missing: usize,
}

impl BifurcationDiagram {
    /// Finite points as (parameter, value) pairs
    pub fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .rows()
            .into_iter()
            .map(|row| (row[0], row[1]))
            .filter(|(_, v)| v.is_finite())
    }
}

/// Discard `transient` elements from every cell and read one value
pub async fn sample_diagram(grid: &mut ParameterGrid<f64>, transient: usize) -> Result<BifurcationDiagram> {
    let rows = *grid.rows();
    let (_, ncols) = grid.shape();
    let mut points = Array2::from_elem((grid.len(), 2), f64::NAN);
    let mut missing = 0usize;

    for ((i, j), seq) in grid.cells_mut() {
        let slot = flat_index(i, j, ncols);
        points[[slot, 0]] = rows.value(i);

        let value = match skip_transient(seq, transient).await {
            Ok(seq) => seq.next_value().await,
            Err(e) => Err(e),
        };
        match value {
            Ok(v) => points[[slot, 1]] = v,
            Err(DynamicsError::NumericDivergence { index }) => {
                warn!(row = i, col = j, index, "cell diverged, left empty");
                missing += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(points = points.nrows(), missing, "diagram sampled");
    Ok(BifurcationDiagram { points, missing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Axis;
    use crate::systems::LogisticMap;
    use std::collections::HashSet;

    #[test]
    fn test_flat_index_is_bijective() {
        for (rows, cols) in [(1, 1), (3, 7), (7, 3), (40, 100)] {
            let slots: HashSet<usize> = (0..rows)
                .flat_map(|r| (0..cols).map(move |c| flat_index(r, c, cols)))
                .collect();
            assert_eq!(slots.len(), rows * cols);
            assert!(slots.iter().all(|&s| s < rows * cols));
        }
    }

    #[tokio::test]
    async fn test_diagram_fixed_point_region() {
        let rows = Axis::new("r", 1.5, 2.9, 0.1).unwrap();
        let cols = Axis::new("x0", 0.1, 0.9, 0.1).unwrap();
        let mut grid = ParameterGrid::build(rows, cols, 32, LogisticMap::cell).unwrap();

        let diagram = sample_diagram(&mut grid, 300).await.unwrap();
        assert_eq!(diagram.points.nrows(), grid.len());
        assert_eq!(diagram.missing, 0);

        for (r, x) in diagram.finite_points() {
            assert!((x - (1.0 - 1.0 / r)).abs() < 1e-3, "r = {}, x = {}", r, x);
        }
        assert_eq!(diagram.finite_points().count(), 14 * 8);
    }
}
