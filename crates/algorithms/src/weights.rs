//! Contiguity weights between grid cells
//!
//! Two cells are queen neighbors when their closed boxes share at least one
//! point, rook neighbors when they share an edge of positive length. On a
//! regular lattice both reduce to fixed lattice offsets.

use crate::maybe_rayon::*;
use lisagrid_core::{Contiguity, Grid, Result, WeightsGraph};
use tracing::debug;

/// Build row-standardized contiguity weights from lattice adjacency.
pub fn build_weights(grid: &Grid, contiguity: Contiguity) -> Result<WeightsGraph> {
    let offsets = contiguity.offsets();

    let neighbors: Vec<Vec<usize>> = grid
        .cells()
        .into_par_iter()
        .map(|cell| {
            offsets
                .iter()
                .filter_map(|&(dr, dc)| grid.index_at_offset(cell.row, cell.col, dr, dc))
                .collect()
        })
        .collect();

    let graph = WeightsGraph::from_neighbors(neighbors)?;
    debug_assert!(graph.is_symmetric());
    debug!(
        cells = graph.len(),
        links = graph.s0() as usize,
        islands = graph.islands().len(),
        "built {} contiguity weights",
        contiguity
    );
    Ok(graph)
}

/// Build the same weights by testing every pair of cell boxes.
///
/// Quadratic in the number of cells; used to cross-check the lattice
/// construction and for grids whose cells are not lattice-aligned.
pub fn build_weights_pairwise(grid: &Grid, contiguity: Contiguity) -> Result<WeightsGraph> {
    let cells = grid.cells();

    let neighbors: Vec<Vec<usize>> = cells
        .into_par_iter()
        .map(|a| {
            let ba = a.bbox();
            cells
                .iter()
                .filter(|b| b.index != a.index)
                .filter(|b| match contiguity {
                    Contiguity::Queen => ba.intersects(&b.bbox()),
                    Contiguity::Rook => ba.shares_edge(&b.bbox()),
                })
                .map(|b| b.index)
                .collect()
        })
        .collect();

    WeightsGraph::from_neighbors(neighbors)
}
