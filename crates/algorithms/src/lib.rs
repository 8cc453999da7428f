//! # lisagrid Algorithms
//!
//! Analysis stages for grid-based spatial autocorrelation.
//!
//! ## Stages
//!
//! - **tessellation**: Square grid clipped to a boundary
//! - **density**: Point counts per cell
//! - **weights**: Queen / rook contiguity weights
//! - **statistics**: Global and local Moran's I, cluster classification
//! - **pipeline**: The stages chained into one run

pub mod density;
mod maybe_rayon;
pub mod pipeline;
pub mod statistics;
pub mod tessellation;
pub mod weights;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::density::{aggregate, locate};
    pub use crate::pipeline::{
        analyze_grid, run_analysis, run_with_store, AnalysisParams, HotSpotAnalysis, StudyArea,
    };
    pub use crate::statistics::{
        classify, global_moran, local_moran, summarize, PermutationParams, DEFAULT_ALPHA,
        DEFAULT_PERMUTATIONS,
    };
    pub use crate::tessellation::{build_grid, GridBuilder, GridParams, DEFAULT_CELL_SIZE};
    pub use crate::weights::{build_weights, build_weights_pairwise};
    pub use lisagrid_core::prelude::*;
}
