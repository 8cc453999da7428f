//! # lisagrid Core
//!
//! Core types, traits and I/O for grid-based spatial autocorrelation.
//!
//! This crate provides:
//! - Geometry primitives: `Point`, `BoundingBox`, `Boundary`
//! - The analysis lattice: `Cell`, `Grid`, `CountVector`, `WeightsGraph`
//! - Statistic records and the labeled-grid `AnalysisReport`
//! - `CRS` / `Projection` for WGS84 ⇄ UTM
//! - GeoJSON / CSV I/O and the `FeatureStore` collaborator trait

pub mod crs;
pub mod error;
pub mod io;
pub mod lattice;
pub mod report;
pub mod vector;

pub use crs::{Projection, CRS};
pub use error::{Error, Result};
pub use lattice::{Cell, Contiguity, CountVector, Grid, WeightsGraph};
pub use report::{
    AnalysisReport, CellRecord, ClusterLabel, ClusterSummary, GlobalStatistic, LocalStatistic,
    Quadrant,
};
pub use vector::{Boundary, BoundingBox, Point};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{Projection, CRS};
    pub use crate::error::{Error, Result};
    pub use crate::io::{FeatureStore, GeoJsonStore};
    pub use crate::lattice::{Cell, Contiguity, CountVector, Grid, WeightsGraph};
    pub use crate::report::{AnalysisReport, ClusterLabel, LocalStatistic, Quadrant};
    pub use crate::vector::{Boundary, BoundingBox, Point};
    pub use crate::Algorithm;
}

/// Core trait for the analysis stages.
///
/// Stages are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(
        &self,
        input: Self::Input,
    ) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
