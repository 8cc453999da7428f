//! Analysis grid: lattice cells that survived clipping

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::lattice::Cell;
use crate::vector::{BoundingBox, Point};

/// Ordered set of cells cut from a regular square lattice.
///
/// Cells are indexed `0..len()` in row-major lattice order. The dense
/// `(row, col) -> index` lookup keeps neighbor queries O(1).
///
/// # Example
///
/// ```ignore
/// use lisagrid_core::{Grid, Point};
///
/// // 2x2 lattice of 100 m cells, all four kept
/// let grid = Grid::from_positions(
///     Point::new(0.0, 0.0), 100.0, 2, 2,
///     vec![(0, 0), (0, 1), (1, 0), (1, 1)],
/// )?;
/// assert_eq!(grid.index_at(1, 0), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Cell>,
    /// Minimum corner of the lattice
    origin: Point,
    cell_size: f64,
    rows: usize,
    cols: usize,
    lookup: Array2<Option<usize>>,
}

impl Grid {
    /// Build a grid from the lattice positions `(row, col)` that are kept.
    ///
    /// Positions are sorted into row-major order and deduplicated before
    /// indices are assigned.
    pub fn from_positions(
        origin: Point,
        cell_size: f64,
        rows: usize,
        cols: usize,
        positions: Vec<(usize, usize)>,
    ) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(Error::invalid_parameter(
                "cell_size",
                cell_size,
                "must be a finite, strictly positive length",
            ));
        }
        if !origin.is_finite() {
            return Err(Error::invalid_parameter(
                "origin",
                format!("({}, {})", origin.x, origin.y),
                "must be finite",
            ));
        }

        let mut positions = positions;
        positions.sort_unstable();
        positions.dedup();

        let mut lookup: Array2<Option<usize>> = Array2::from_elem((rows, cols), None);
        let mut cells = Vec::with_capacity(positions.len());

        for (index, (row, col)) in positions.into_iter().enumerate() {
            if row >= rows || col >= cols {
                return Err(Error::invalid_parameter(
                    "position",
                    format!("({}, {})", row, col),
                    format!("outside a {} x {} lattice", rows, cols),
                ));
            }
            lookup[(row, col)] = Some(index);
            cells.push(Cell {
                index,
                row,
                col,
                bbox: BoundingBox::new(
                    origin.x + col as f64 * cell_size,
                    origin.y + row as f64 * cell_size,
                    origin.x + (col + 1) as f64 * cell_size,
                    origin.y + (row + 1) as f64 * cell_size,
                ),
            });
        }

        Ok(Self {
            cells,
            origin,
            cell_size,
            rows,
            cols,
            lookup,
        })
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Lattice shape (rows, cols), including dropped positions
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Extent of the full lattice
    pub fn lattice_bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.cols as f64 * self.cell_size,
            self.origin.y + self.rows as f64 * self.cell_size,
        )
    }

    /// Cell index at a lattice position, if that position survived
    pub fn index_at(&self, row: usize, col: usize) -> Option<usize> {
        self.lookup.get((row, col)).copied().flatten()
    }

    /// Cell index at `(row + dr, col + dc)`, if inside the lattice and kept
    pub fn index_at_offset(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<usize> {
        let nr = row as isize + dr;
        let nc = col as isize + dc;
        if nr < 0 || nc < 0 {
            return None;
        }
        self.index_at(nr as usize, nc as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(rows: usize, cols: usize) -> Vec<(usize, usize)> {
        (0..rows).flat_map(|r| (0..cols).map(move |c| (r, c))).collect()
    }

    #[test]
    fn test_indices_are_row_major() {
        let grid = Grid::from_positions(Point::new(0.0, 0.0), 10.0, 2, 3, full(2, 3)).unwrap();
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.index_at(0, 2), Some(2));
        assert_eq!(grid.index_at(1, 0), Some(3));
        let c = grid.cell(4).unwrap();
        assert_eq!((c.row, c.col), (1, 1));
        assert_eq!(c.origin(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_unsorted_positions_reindexed() {
        let grid = Grid::from_positions(
            Point::new(0.0, 0.0),
            1.0,
            2,
            2,
            vec![(1, 1), (0, 1), (1, 1)],
        )
        .unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.index_at(0, 1), Some(0));
        assert_eq!(grid.index_at(1, 1), Some(1));
        assert_eq!(grid.index_at(0, 0), None);
    }

    #[test]
    fn test_offset_lookup_outside_lattice() {
        let grid = Grid::from_positions(Point::new(0.0, 0.0), 1.0, 2, 2, full(2, 2)).unwrap();
        assert_eq!(grid.index_at_offset(0, 0, -1, 0), None);
        assert_eq!(grid.index_at_offset(0, 0, 1, 1), Some(3));
        assert_eq!(grid.index_at_offset(1, 1, 1, 0), None);
    }

    #[test]
    fn test_position_out_of_bounds() {
        let res = Grid::from_positions(Point::new(0.0, 0.0), 1.0, 2, 2, vec![(2, 0)]);
        assert!(res.is_err());
    }

    #[test]
    fn test_non_positive_cell_size() {
        let err = Grid::from_positions(Point::new(0.0, 0.0), 0.0, 1, 1, vec![(0, 0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "cell_size", .. }));
    }

    #[test]
    fn test_lattice_bbox() {
        let grid = Grid::from_positions(Point::new(5.0, 5.0), 2.0, 3, 4, vec![(0, 0)]).unwrap();
        let b = grid.lattice_bbox();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (5.0, 5.0, 13.0, 11.0));
    }
}
