//! Point-in-cell density aggregation
//!
//! Each point is assigned to the unique cell that contains it. Cells are
//! closed boxes, so a point on a shared edge or corner lies in several;
//! the lowest cell index wins. Points outside every surviving cell and
//! points with non-finite coordinates are not counted.

use crate::maybe_rayon::*;
use lisagrid_core::{CountVector, Grid, Point};
use tracing::debug;

/// Index of the cell containing `point`, if any.
///
/// Only the 3x3 lattice block around the point's floor position can hold
/// it, so lookup cost does not depend on the grid size.
pub fn locate(grid: &Grid, point: &Point) -> Option<usize> {
    if !point.is_finite() {
        return None;
    }

    let origin = grid.origin();
    let size = grid.cell_size();
    let fx = ((point.x - origin.x) / size).floor();
    let fy = ((point.y - origin.y) / size).floor();
    let (rows, cols) = grid.shape();
    if fx < -1.0 || fy < -1.0 || fx > cols as f64 || fy > rows as f64 {
        return None;
    }

    let col = fx as isize;
    let row = fy as isize;
    let mut best: Option<usize> = None;

    for dr in -1..=1_isize {
        for dc in -1..=1_isize {
            let r = row + dr;
            let c = col + dc;
            if r < 0 || c < 0 {
                continue;
            }
            if let Some(idx) = grid.index_at(r as usize, c as usize) {
                let inside = grid
                    .cell(idx)
                    .map_or(false, |cell| cell.bbox().contains_point(point));
                if inside && best.map_or(true, |b| idx < b) {
                    best = Some(idx);
                }
            }
        }
    }

    best
}

/// Count points per cell.
///
/// The sum of the returned counts equals the number of points that fall
/// within some cell; every other point is dropped.
pub fn aggregate(grid: &Grid, points: &[Point]) -> CountVector {
    let located: Vec<Option<usize>> = points.into_par_iter().map(|p| locate(grid, p)).collect();

    let mut counts = CountVector::zeros(grid.len());
    let mut dropped = 0usize;
    for idx in located {
        match idx {
            Some(i) => counts.increment(i),
            None => dropped += 1,
        }
    }

    debug!(
        points = points.len(),
        counted = counts.total(),
        dropped,
        "aggregated points into {} cells",
        grid.len()
    );

    counts
}
