//! Coarse spatial grid for collision candidate lookup
//!
//! Every live enemy is bucketed by the cell containing its center. Queries
//! return only the bucket of the queried point's own cell: no neighbor cells
//! are consulted, so an enemy whose body reaches across a cell boundary is
//! invisible to a point on the other side. Callers must still do the exact
//! distance check.

use glam::Vec2;
use std::collections::HashMap;

/// Per-tick bucket map from cell coordinate to enemy indices
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(50.0)
    }
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Change the cell size (arena resize). Clears the grid.
    pub fn set_cell_size(&mut self, cell_size: f32) {
        self.cell_size = cell_size.max(1.0);
        self.cells.clear();
    }

    /// Cell coordinates for a world position
    pub fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        let x = (pos.x / self.cell_size).floor() as i32;
        let y = (pos.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Reset for a bulk rebuild, keeping bucket allocations
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    pub fn insert(&mut self, index: usize, pos: Vec2) {
        let cell = self.cell_of(pos);
        self.cells.entry(cell).or_default().push(index);
    }

    /// Indices sharing the cell of `pos`, in insertion order
    pub fn candidates(&self, pos: Vec2) -> &[usize] {
        self.cells
            .get(&self.cell_of(pos))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total indices stored
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_cell_lookup() {
        let mut grid = SpatialGrid::new(50.0);
        grid.insert(0, Vec2::new(10.0, 10.0));
        grid.insert(1, Vec2::new(49.0, 0.0));
        grid.insert(2, Vec2::new(51.0, 0.0));

        assert_eq!(grid.candidates(Vec2::new(25.0, 25.0)), &[0, 1]);
        assert_eq!(grid.candidates(Vec2::new(75.0, 1.0)), &[2]);
        assert_eq!(grid.len(), 3);
    }

    #[test]
    fn test_neighbor_cells_are_not_searched() {
        let mut grid = SpatialGrid::new(50.0);
        // Enemy center just across the boundary from the query point
        grid.insert(7, Vec2::new(50.5, 10.0));
        assert!(grid.candidates(Vec2::new(49.5, 10.0)).is_empty());
    }

    #[test]
    fn test_negative_positions_floor() {
        let grid = SpatialGrid::new(50.0);
        assert_eq!(grid.cell_of(Vec2::new(-1.0, -1.0)), (-1, -1));
        assert_eq!(grid.cell_of(Vec2::new(0.0, 0.0)), (0, 0));
    }

    #[test]
    fn test_clear_empties_buckets() {
        let mut grid = SpatialGrid::new(50.0);
        grid.insert(0, Vec2::new(10.0, 10.0));
        grid.clear();
        assert!(grid.is_empty());
        assert!(grid.candidates(Vec2::new(10.0, 10.0)).is_empty());
    }
}
