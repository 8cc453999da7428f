//! Storage collaborator
//!
//! The analysis pulls its inputs from and hands its result to a
//! [`FeatureStore`]; the engine itself never performs I/O.

use geo::Polygon;
use std::path::PathBuf;

use crate::crs::Projection;
use crate::error::Result;
use crate::io::{read_boundary, read_points, write_report_csv, write_report_geojson};
use crate::report::AnalysisReport;
use crate::vector::Point;

/// Source of boundary and point features, and sink for the labeled grid.
///
/// Geometries returned by a store are already in the metric analysis frame.
pub trait FeatureStore {
    /// All boundary polygons of the study area
    fn boundaries(&self) -> Result<Vec<Polygon<f64>>>;

    /// Representative locations of all point features
    fn points(&self) -> Result<Vec<Point>>;

    /// Persist the labeled grid
    fn store_report(&mut self, report: &AnalysisReport) -> Result<()>;
}

/// File-backed store: GeoJSON inputs, GeoJSON (and optionally CSV) output.
///
/// With a UTM [`Projection`], inputs are read as WGS84 and projected into the
/// analysis frame; the output GeoJSON is projected back to WGS84. The CSV
/// table keeps analysis-frame coordinates.
#[derive(Debug, Clone)]
pub struct GeoJsonStore {
    pub boundary_path: PathBuf,
    pub points_path: PathBuf,
    pub output_path: PathBuf,
    pub csv_path: Option<PathBuf>,
    pub projection: Projection,
}

impl GeoJsonStore {
    pub fn new(
        boundary_path: impl Into<PathBuf>,
        points_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            boundary_path: boundary_path.into(),
            points_path: points_path.into(),
            output_path: output_path.into(),
            csv_path: None,
            projection: Projection::Identity,
        }
    }

    pub fn with_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = Some(path.into());
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }
}

impl FeatureStore for GeoJsonStore {
    fn boundaries(&self) -> Result<Vec<Polygon<f64>>> {
        Ok(read_boundary(&self.boundary_path)?
            .iter()
            .map(|p| self.projection.project(p))
            .collect())
    }

    fn points(&self) -> Result<Vec<Point>> {
        Ok(read_points(&self.points_path)?
            .into_iter()
            .map(|p| self.projection.forward_point(p))
            .collect())
    }

    fn store_report(&mut self, report: &AnalysisReport) -> Result<()> {
        write_report_geojson(report, &self.output_path, &self.projection)?;
        if let Some(csv_path) = &self.csv_path {
            write_report_csv(report, csv_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::with_suffix(".geojson").unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_store_reads_inputs() {
        let boundary = write_tmp(
            r#"{"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]]}"#,
        );
        let points = write_tmp(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}}
            ]}"#,
        );
        let out = tempfile::NamedTempFile::with_suffix(".geojson").unwrap();

        let store = GeoJsonStore::new(boundary.path(), points.path(), out.path());
        assert_eq!(store.boundaries().unwrap().len(), 1);
        assert_eq!(store.points().unwrap(), vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn test_store_missing_file_is_io_error() {
        let store = GeoJsonStore::new("/nonexistent/b.geojson", "/nonexistent/p.geojson", "out");
        assert!(matches!(store.boundaries(), Err(crate::Error::Io(_))));
    }
}
