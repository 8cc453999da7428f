//! End-to-end hot spot analysis
//!
//! boundary + points → grid → counts → weights → Moran's I → cluster labels

use lisagrid_core::io::FeatureStore;
use lisagrid_core::{
    Algorithm, AnalysisReport, Boundary, CellRecord, ClusterSummary, Contiguity, CountVector,
    Error, Grid, Point, Result,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::density::aggregate;
use crate::statistics::{
    classify, global_moran, local_moran, validate_alpha, validate_permutations,
    PermutationParams, DEFAULT_ALPHA, DEFAULT_PERMUTATIONS,
};
use crate::tessellation::{build_grid, validate_cell_size, DEFAULT_CELL_SIZE};
use crate::weights::build_weights;

/// Parameters for a full analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Cell side length in metres
    pub cell_size: f64,
    /// Permutations for the pseudo p-values
    pub permutations: usize,
    /// Significance level for cluster labels
    pub alpha: f64,
    /// Seed of the permutation generator; drawn from entropy when unset
    pub seed: Option<u64>,
    pub contiguity: Contiguity,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            permutations: DEFAULT_PERMUTATIONS,
            alpha: DEFAULT_ALPHA,
            seed: None,
            contiguity: Contiguity::Queen,
        }
    }
}

impl AnalysisParams {
    /// Check every parameter before any work is done
    pub fn validate(&self) -> Result<()> {
        validate_cell_size(self.cell_size)?;
        validate_permutations(self.permutations)?;
        validate_alpha(self.alpha)
    }

    /// The configured seed, or a fresh one from entropy
    pub fn resolve_seed(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                info!(seed, "no seed given, drew one from entropy");
                seed
            }
        }
    }
}

/// Run the analysis on a boundary and point features in one metric frame
pub fn run_analysis(
    boundary: &Boundary,
    points: &[Point],
    params: &AnalysisParams,
) -> Result<AnalysisReport> {
    params.validate()?;

    let grid = build_grid(boundary, params.cell_size)?;
    let counts = aggregate(&grid, points);

    let dropped = points.len() as u64 - counts.total();
    if dropped > 0 {
        warn!(
            dropped,
            total = points.len(),
            "{} points fall outside every grid cell and were not counted",
            dropped
        );
    }

    analyze_grid(&grid, &counts, params)
}

/// Run the statistics and classification stages on precomputed counts
pub fn analyze_grid(
    grid: &Grid,
    counts: &CountVector,
    params: &AnalysisParams,
) -> Result<AnalysisReport> {
    params.validate()?;
    if counts.len() != grid.len() {
        return Err(Error::SizeMismatch {
            expected: grid.len(),
            actual: counts.len(),
        });
    }

    let weights = build_weights(grid, params.contiguity)?;
    let islands = weights.islands();
    if !islands.is_empty() {
        warn!(
            islands = islands.len(),
            "{} cells have no {} neighbors and are left unclassified",
            islands.len(),
            params.contiguity
        );
    }

    let perm = PermutationParams::new(params.permutations, params.resolve_seed());
    let global = global_moran(counts, &weights, &perm)?;
    let local = local_moran(counts, &weights, &perm)?;
    let labels = classify(&local, params.alpha)?;
    debug!(cells = grid.len(), "classified local statistics");

    let cells: Vec<CellRecord> = grid
        .iter()
        .zip(counts.iter())
        .zip(local.iter().zip(&labels))
        .map(|((cell, count), (stat, label))| CellRecord {
            cell_index: cell.index,
            cell_geometry: cell.bbox(),
            count,
            neighbor_count: stat.neighbor_count,
            local_i: stat.local_i,
            local_p_value: stat.p_value,
            cluster_label: *label,
        })
        .collect();

    let summary = ClusterSummary::from_labels(&labels);
    info!(
        global_i = global.i,
        global_p_value = global.p_value,
        hh = summary.hh,
        ll = summary.ll,
        hl = summary.hl,
        lh = summary.lh,
        ns = summary.ns,
        "Moran's I = {:.4} (p = {:.4}) over {} cells",
        global.i,
        global.p_value,
        cells.len()
    );

    Ok(AnalysisReport {
        global,
        cells,
        summary,
        cell_size: grid.cell_size(),
        alpha: params.alpha,
        seed: perm.seed,
    })
}

/// Read inputs from a store, analyze, and hand the report back to it
pub fn run_with_store<S: FeatureStore>(
    store: &mut S,
    params: &AnalysisParams,
) -> Result<AnalysisReport> {
    params.validate()?;

    let boundary = Boundary::from_polygons(store.boundaries()?)?;
    let points = store.points()?;
    debug!(
        points = points.len(),
        area = boundary.area(),
        "loaded features from store"
    );

    let report = run_analysis(&boundary, &points, params)?;
    store.store_report(&report)?;
    Ok(report)
}

/// Input of [`HotSpotAnalysis`]
#[derive(Debug, Clone)]
pub struct StudyArea {
    pub boundary: Boundary,
    pub points: Vec<Point>,
}

/// Hot spot analysis algorithm
#[derive(Debug, Clone, Default)]
pub struct HotSpotAnalysis;

impl Algorithm for HotSpotAnalysis {
    type Input = StudyArea;
    type Output = AnalysisReport;
    type Params = AnalysisParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "HotSpotAnalysis"
    }

    fn description(&self) -> &'static str {
        "Global and local Moran's I of point density on a clipped square grid"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        run_analysis(&input.boundary, &input.points, &params)
    }
}
