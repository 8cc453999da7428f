//! Grid tessellation of a boundary
//!
//! Tiles the boundary's bounding box with a row-major lattice of squares
//! starting at its minimum corner, then keeps only the squares that
//! intersect the boundary itself (not merely its bounding box).

use crate::maybe_rayon::*;
use lisagrid_core::{Algorithm, Boundary, BoundingBox, Error, Grid, Point, Result};
use tracing::debug;

/// Default cell side length in metres
pub const DEFAULT_CELL_SIZE: f64 = 500.0;

/// Upper bound on lattice positions, to reject cell sizes that are tiny
/// relative to the boundary extent before allocating anything
pub const MAX_LATTICE_CELLS: usize = 50_000_000;

/// Parameters for grid construction
#[derive(Debug, Clone)]
pub struct GridParams {
    /// Cell side length, in the units of the projected frame
    pub cell_size: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

/// Grid builder algorithm
#[derive(Debug, Clone, Default)]
pub struct GridBuilder;

impl Algorithm for GridBuilder {
    type Input = Boundary;
    type Output = Grid;
    type Params = GridParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Grid"
    }

    fn description(&self) -> &'static str {
        "Square lattice clipped to the cells intersecting a boundary"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        build_grid(&input, params.cell_size)
    }
}

/// Reject non-finite and non-positive cell sizes
pub fn validate_cell_size(cell_size: f64) -> Result<()> {
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(Error::invalid_parameter(
            "cell_size",
            cell_size,
            "must be a finite, strictly positive length",
        ));
    }
    Ok(())
}

/// Build the analysis grid for a boundary
///
/// # Arguments
/// * `boundary` - Study area (already validated as non-degenerate)
/// * `cell_size` - Cell side length
///
/// # Returns
/// Grid of the cells whose box intersects the boundary, indexed 0..N in
/// row-major lattice order
pub fn build_grid(boundary: &Boundary, cell_size: f64) -> Result<Grid> {
    validate_cell_size(cell_size)?;

    let bbox = boundary.bbox();
    let cols = ((bbox.width() / cell_size).ceil() as usize).max(1);
    let rows = ((bbox.height() / cell_size).ceil() as usize).max(1);

    if rows.saturating_mul(cols) > MAX_LATTICE_CELLS {
        return Err(Error::invalid_parameter(
            "cell_size",
            cell_size,
            format!(
                "produces a {} x {} lattice, above the limit of {} cells",
                rows, cols, MAX_LATTICE_CELLS
            ),
        ));
    }

    let origin = Point::new(bbox.min_x, bbox.min_y);

    let positions: Vec<(usize, usize)> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let y0 = origin.y + row as f64 * cell_size;
            let y1 = origin.y + (row + 1) as f64 * cell_size;
            let mut kept = Vec::new();
            for col in 0..cols {
                let cell = BoundingBox::new(
                    origin.x + col as f64 * cell_size,
                    y0,
                    origin.x + (col + 1) as f64 * cell_size,
                    y1,
                );
                if boundary.intersects_box(&cell) {
                    kept.push((row, col));
                }
            }
            kept
        })
        .collect();

    if positions.is_empty() {
        return Err(Error::EmptyGrid {
            cell_size,
            min_x: bbox.min_x,
            min_y: bbox.min_y,
            max_x: bbox.max_x,
            max_y: bbox.max_y,
        });
    }

    debug!(
        rows,
        cols,
        kept = positions.len(),
        "tessellated boundary into {} cells",
        positions.len()
    );

    Grid::from_positions(origin, cell_size, rows, cols, positions)
}
