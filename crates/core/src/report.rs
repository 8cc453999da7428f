//! Statistic records and the labeled-grid report
//!
//! These are the fixed-shape values handed between the autocorrelation
//! engine, the classifier and the storage layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vector::BoundingBox;

/// Moran scatterplot quadrant of a cell: the sign of its own deviation from
/// the mean against the sign of its neighbors' average deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    HighHigh,
    LowLow,
    HighLow,
    LowHigh,
    /// Zero deviation, zero lag, or no neighbors
    Unclassified,
}

impl Quadrant {
    /// Quadrant from a cell's deviation `z` and its spatial lag
    pub fn from_deviation(z: f64, lag: f64) -> Self {
        match (z, lag) {
            (z, l) if z > 0.0 && l > 0.0 => Quadrant::HighHigh,
            (z, l) if z < 0.0 && l < 0.0 => Quadrant::LowLow,
            (z, l) if z > 0.0 && l < 0.0 => Quadrant::HighLow,
            (z, l) if z < 0.0 && l > 0.0 => Quadrant::LowHigh,
            _ => Quadrant::Unclassified,
        }
    }
}

/// Local Moran's I (LISA) for one cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalStatistic {
    pub local_i: f64,
    /// Conditional-permutation pseudo p-value
    pub p_value: f64,
    /// Standardized deviation of `local_i` from the permutation mean
    pub z_sim: f64,
    /// Spatial lag of the cell's deviation from the mean
    pub lag: f64,
    pub quadrant: Quadrant,
    pub neighbor_count: usize,
}

impl LocalStatistic {
    /// Record for a cell without neighbors: no statistic can be computed
    pub fn isolated() -> Self {
        Self {
            local_i: 0.0,
            p_value: 1.0,
            z_sim: 0.0,
            lag: 0.0,
            quadrant: Quadrant::Unclassified,
            neighbor_count: 0,
        }
    }

    pub fn is_isolated(&self) -> bool {
        self.neighbor_count == 0
    }
}

/// Global Moran's I with its permutation pseudo p-value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatistic {
    #[serde(rename = "global_i")]
    pub i: f64,
    /// E[I] under spatial randomness, -1/(n-1)
    pub expected: f64,
    #[serde(rename = "global_p_value")]
    pub p_value: f64,
    pub z_sim: f64,
    pub permutations: usize,
}

/// Cluster category attached to each cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusterLabel {
    /// Hot spot: high value among high neighbors
    HH,
    /// Cold spot: low value among low neighbors
    LL,
    /// High outlier among low neighbors
    HL,
    /// Low outlier among high neighbors
    LH,
    /// Not significant
    NS,
}

impl ClusterLabel {
    /// Label of a significant cell; unclassified quadrants stay NS
    pub fn from_quadrant(q: Quadrant) -> Self {
        match q {
            Quadrant::HighHigh => ClusterLabel::HH,
            Quadrant::LowLow => ClusterLabel::LL,
            Quadrant::HighLow => ClusterLabel::HL,
            Quadrant::LowHigh => ClusterLabel::LH,
            Quadrant::Unclassified => ClusterLabel::NS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterLabel::HH => "HH",
            ClusterLabel::LL => "LL",
            ClusterLabel::HL => "HL",
            ClusterLabel::LH => "LH",
            ClusterLabel::NS => "NS",
        }
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of cells carrying each label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub hh: usize,
    pub ll: usize,
    pub hl: usize,
    pub lh: usize,
    pub ns: usize,
}

impl ClusterSummary {
    pub fn from_labels(labels: &[ClusterLabel]) -> Self {
        let mut s = Self::default();
        for label in labels {
            match label {
                ClusterLabel::HH => s.hh += 1,
                ClusterLabel::LL => s.ll += 1,
                ClusterLabel::HL => s.hl += 1,
                ClusterLabel::LH => s.lh += 1,
                ClusterLabel::NS => s.ns += 1,
            }
        }
        s
    }

    pub fn total(&self) -> usize {
        self.hh + self.ll + self.hl + self.lh + self.ns
    }

    /// Cells labeled with one of the four significant categories
    pub fn significant(&self) -> usize {
        self.total() - self.ns
    }
}

/// One output row: a labeled grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub cell_index: usize,
    pub cell_geometry: BoundingBox,
    pub count: u64,
    /// Zero marks a cell with no neighbors
    pub neighbor_count: usize,
    pub local_i: f64,
    pub local_p_value: f64,
    pub cluster_label: ClusterLabel,
}

/// Complete result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub global: GlobalStatistic,
    pub cells: Vec<CellRecord>,
    pub summary: ClusterSummary,
    pub cell_size: f64,
    pub alpha: f64,
    /// Seed of the permutation generator, recorded so the run can be repeated
    pub seed: u64,
}
