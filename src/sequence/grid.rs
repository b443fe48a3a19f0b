//! Parameter Grid: one sequence per (row, column) parameter cell
//!
//! The grid is built in a single pass over both axes. Every kernel and
//! initial state is validated before the first producer is spawned, so an
//! out-of-domain cell aborts construction without leaving tasks behind.
//! Cells live in an `Array2` whose shape is checked against both axis
//! lengths; afterwards the grid is read-only apart from the per-cell queues.

use ndarray::Array2;
use tracing::info;

use super::axis::Axis;
use super::stream::Sequence;
use crate::error::{DynamicsError, Result};
use crate::systems::RecurrenceKernel;

/// Two-dimensional collection of running sequences
#[derive(Debug)]
pub struct ParameterGrid<P> {
    rows: Axis,
    cols: Axis,
    cells: Array2<Sequence<P>>,
}

impl<P: Send + 'static> ParameterGrid<P> {
    /// Largest number of sequences a grid may hold
    pub const MAX_SEQUENCES: usize = u32::MAX as usize;

    /// Build the grid, spawning one producer per cell
    ///
    /// `factory` receives the row and column parameter values of each cell
    /// and returns its kernel and initial state. Must be called from within
    /// a tokio runtime.
    pub fn build<K, F>(rows: Axis, cols: Axis, capacity: usize, mut factory: F) -> Result<Self>
    where
        K: RecurrenceKernel<Point = P>,
        F: FnMut(f64, f64) -> Result<(K, K::State)>,
    {
        let total = rows
            .len()
            .checked_mul(cols.len())
            .filter(|&n| n <= Self::MAX_SEQUENCES)
            .ok_or_else(|| {
                DynamicsError::GridShape(format!(
                    "{} x {} cells exceeds the limit of {} sequences",
                    rows.len(),
                    cols.len(),
                    Self::MAX_SEQUENCES
                ))
            })?;
        let mut seeds = Vec::with_capacity(total);
        for i in 0..rows.len() {
            let row_value = rows.value(i);
            for j in 0..cols.len() {
                seeds.push(factory(row_value, cols.value(j))?);
            }
        }

        let sequences = seeds
            .into_iter()
            .map(|(kernel, initial)| Sequence::spawn_with_capacity(kernel, initial, capacity))
            .collect::<Result<Vec<_>>>()?;

        let cells = Array2::from_shape_vec((rows.len(), cols.len()), sequences)
            .map_err(|e| DynamicsError::GridShape(e.to_string()))?;

        info!(
            rows = rows.len(),
            cols = cols.len(),
            sequences = total,
            row_axis = rows.name(),
            col_axis = cols.name(),
            "parameter grid built"
        );

        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> &Axis {
        &self.rows
    }

    pub fn cols(&self) -> &Axis {
        &self.cols
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Total number of sequences
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sequence at continuous parameter values (row, column)
    pub fn at(&mut self, row_value: f64, col_value: f64) -> Result<&mut Sequence<P>> {
        let i = self.rows.index_of(row_value)?;
        let j = self.cols.index_of(col_value)?;
        Ok(&mut self.cells[[i, j]])
    }

    /// Sequence at discrete indices
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Sequence<P>> {
        self.cells.get_mut((row, col))
    }

    /// Sequences at `col_value` and at the next column, same row
    pub fn neighbours(&mut self, row_value: f64, col_value: f64) -> Result<(&mut Sequence<P>, &mut Sequence<P>)> {
        let i = self.rows.index_of(row_value)?;
        let j = self.cols.index_of(col_value)?;
        if j + 1 >= self.cols.len() {
            return Err(DynamicsError::IndexOutOfRange {
                axis: self.cols.name(),
                value: self.cols.value(j + 1),
                index: (j + 1) as i64,
                len: self.cols.len(),
            });
        }
        let ncols = self.cols.len();
        let flat = self
            .cells
            .as_slice_mut()
            .ok_or_else(|| DynamicsError::GridShape("cells are not contiguous".into()))?;
        let (left, right) = flat.split_at_mut(i * ncols + j + 1);
        Ok((&mut left[i * ncols + j], &mut right[0]))
    }

    /// Row values paired with the sequences of column `col_value`, in row
    /// order
    pub fn column(&mut self, col_value: f64) -> Result<impl Iterator<Item = (f64, &mut Sequence<P>)> + '_> {
        let j = self.cols.index_of(col_value)?;
        let rows = self.rows;
        Ok(self
            .cells
            .column_mut(j)
            .into_iter()
            .enumerate()
            .map(move |(i, seq)| (rows.value(i), seq)))
    }

    /// Every cell with its (row, column) index, row-major
    pub fn cells_mut(&mut self) -> impl Iterator<Item = ((usize, usize), &mut Sequence<P>)> + '_ {
        self.cells.indexed_iter_mut()
    }

    /// Cancel every producer, then wait for all of them to exit
    pub async fn shutdown(&mut self) -> Result<()> {
        for seq in self.cells.iter() {
            seq.cancel();
        }
        for seq in self.cells.iter_mut() {
            seq.shutdown().await?;
        }
        info!(sequences = self.cells.len(), "parameter grid shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::LogisticMap;

    /// Live tasks on the current runtime once pending wakeups have run
    async fn settled_task_count() -> usize {
        let handle = tokio::runtime::Handle::current();
        for _ in 0..1000 {
            if handle.metrics().num_alive_tasks() == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        handle.metrics().num_alive_tasks()
    }

    fn small_grid() -> ParameterGrid<f64> {
        let rows = Axis::new("r", 2.0, 4.0, 0.5).unwrap();
        let cols = Axis::new("x0", 0.1, 0.4, 0.1).unwrap();
        ParameterGrid::build(rows, cols, 16, LogisticMap::cell).unwrap()
    }

    #[tokio::test]
    async fn test_grid_shape_and_lookup() {
        let mut grid = small_grid();
        assert_eq!(grid.shape(), (4, 3));
        assert_eq!(grid.len(), 12);

        let seq = grid.at(3.5, 0.2).unwrap();
        assert!((seq.next_value().await.unwrap() - 0.2).abs() < 1e-12);
        let second = seq.next_value().await.unwrap();
        assert!((second - 3.5 * 0.2 * 0.8).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_grid_rejects_values_outside_extent() {
        let mut grid = small_grid();
        assert!(matches!(
            grid.at(4.0, 0.2),
            Err(DynamicsError::IndexOutOfRange { axis: "r", index: 4, .. })
        ));
        assert!(matches!(
            grid.at(2.0, 0.05),
            Err(DynamicsError::IndexOutOfRange { axis: "x0", .. })
        ));
    }

    #[tokio::test]
    async fn test_grid_validates_before_spawning() {
        let rows = Axis::new("r", 3.0, 5.0, 0.5).unwrap();
        let cols = Axis::point("x0", 0.5).unwrap();
        let result = ParameterGrid::build(rows, cols, 16, LogisticMap::cell);
        assert!(matches!(result, Err(DynamicsError::OutOfDomain { parameter: "r", .. })));
    }

    #[tokio::test]
    async fn test_grid_rejects_oversized_shape() {
        let rows = Axis::new("r", 0.0, 1.0, 1e-9).unwrap();
        let cols = Axis::new("x0", 0.0, 1.0, 0.01).unwrap();
        let mut calls = 0;
        let result = ParameterGrid::build(rows, cols, 16, |r, x0| {
            calls += 1;
            LogisticMap::cell(r, x0)
        });
        assert!(matches!(result, Err(DynamicsError::GridShape(_))));
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_grid_neighbours_are_adjacent_columns() {
        let mut grid = small_grid();
        let (left, right) = grid.neighbours(3.0, 0.2).unwrap();
        assert!((left.next_value().await.unwrap() - 0.2).abs() < 1e-12);
        assert!((right.next_value().await.unwrap() - 0.3).abs() < 1e-12);
        assert!(grid.neighbours(3.0, 0.3).is_err());
    }

    #[tokio::test]
    async fn test_grid_column_iterates_rows_in_order() {
        let mut grid = small_grid();
        let rows: Vec<f64> = grid.column(0.1).unwrap().map(|(r, _)| r).collect();
        assert_eq!(rows, vec![2.0, 2.5, 3.0, 3.5]);
    }

    #[tokio::test]
    async fn test_grid_shutdown_stops_all_producers() {
        let mut grid = small_grid();
        grid.shutdown().await.unwrap();
        assert_eq!(settled_task_count().await, 0);
        for (_, seq) in grid.cells_mut() {
            assert!(seq.next().await.is_err());
        }
    }

    #[tokio::test]
    async fn test_grid_drop_stops_all_producers() {
        let mut grid = small_grid();
        grid.at(3.0, 0.2).unwrap().next_value().await.unwrap();
        assert_eq!(tokio::runtime::Handle::current().metrics().num_alive_tasks(), 12);

        drop(grid);
        assert_eq!(settled_task_count().await, 0);
    }
}
