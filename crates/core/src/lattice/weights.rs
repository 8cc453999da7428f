//! Row-standardized spatial weights

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sparse contiguity weights over grid cells.
///
/// Row `i` lists the neighbors of cell `i` in ascending index order, each
/// weighted `1 / |neighbors|`. Cells without neighbors ("islands") keep an
/// empty row; they are valid and must be special-cased by consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsGraph {
    neighbors: Vec<Vec<usize>>,
    weights: Vec<Vec<f64>>,
}

impl WeightsGraph {
    /// Build row-standardized weights from neighbor lists.
    ///
    /// Lists are sorted and deduplicated. Self references and indices outside
    /// `0..neighbors.len()` are rejected.
    pub fn from_neighbors(neighbors: Vec<Vec<usize>>) -> Result<Self> {
        let n = neighbors.len();
        let mut rows = Vec::with_capacity(n);
        let mut weights = Vec::with_capacity(n);

        for (i, mut row) in neighbors.into_iter().enumerate() {
            row.sort_unstable();
            row.dedup();
            if let Some(&j) = row.iter().find(|&&j| j >= n || j == i) {
                return Err(Error::invalid_parameter(
                    "neighbor",
                    format!("{} -> {}", i, j),
                    format!("neighbor index must differ from the cell and be below {}", n),
                ));
            }
            let w = if row.is_empty() { 0.0 } else { 1.0 / row.len() as f64 };
            weights.push(vec![w; row.len()]);
            rows.push(row);
        }

        Ok(Self {
            neighbors: rows,
            weights,
        })
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    pub fn weights(&self, i: usize) -> &[f64] {
        &self.weights[i]
    }

    pub fn neighbor_count(&self, i: usize) -> usize {
        self.neighbors[i].len()
    }

    /// Cells with no neighbors
    pub fn islands(&self) -> Vec<usize> {
        self.neighbors
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// Sum of all weights (S0)
    pub fn s0(&self) -> f64 {
        self.weights.iter().flatten().sum()
    }

    /// Sum of row `i`'s weights: 1 for connected cells, 0 for islands
    pub fn row_sum(&self, i: usize) -> f64 {
        self.weights[i].iter().sum()
    }

    /// Spatial lag of `values` at cell `i`: Σ_j w_ij · values_j
    pub fn lag(&self, values: &[f64], i: usize) -> f64 {
        self.neighbors[i]
            .iter()
            .zip(&self.weights[i])
            .map(|(&j, &w)| w * values[j])
            .sum()
    }

    /// Neighbor relation is symmetric (always the case for contiguity)
    pub fn is_symmetric(&self) -> bool {
        self.neighbors.iter().enumerate().all(|(i, row)| {
            row.iter().all(|&j| self.neighbors[j].binary_search(&i).is_ok())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_standardization() {
        let w = WeightsGraph::from_neighbors(vec![vec![1, 2], vec![0], vec![0], vec![]]).unwrap();
        assert_eq!(w.weights(0), &[0.5, 0.5]);
        assert!((w.row_sum(1) - 1.0).abs() < 1e-12);
        assert_eq!(w.row_sum(3), 0.0);
        assert_eq!(w.islands(), vec![3]);
        assert!((w.s0() - 3.0).abs() < 1e-12);
        assert!(w.is_symmetric());
    }

    #[test]
    fn test_lag() {
        let w = WeightsGraph::from_neighbors(vec![vec![1, 2], vec![0], vec![0]]).unwrap();
        let v = [1.0, 4.0, 8.0];
        assert!((w.lag(&v, 0) - 6.0).abs() < 1e-12);
        assert!((w.lag(&v, 2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_self_neighbor_rejected() {
        assert!(WeightsGraph::from_neighbors(vec![vec![0]]).is_err());
        assert!(WeightsGraph::from_neighbors(vec![vec![5], vec![]]).is_err());
    }

    #[test]
    fn test_duplicates_removed() {
        let w = WeightsGraph::from_neighbors(vec![vec![1, 1], vec![0]]).unwrap();
        assert_eq!(w.neighbors(0), &[1]);
        assert_eq!(w.weights(0), &[1.0]);
    }
}
