//! Reading inputs and writing the labeled grid

mod csv_io;
mod geojson_io;
mod store;

pub use csv_io::{write_report_csv, write_report_csv_to};
pub use geojson_io::{
    boundary_polygons, feature_points, geometries, grid_to_geojson, inspect_geojson,
    parse_geojson, read_boundary, read_points, report_to_geojson, write_feature_collection,
    write_report_geojson, GeoJsonInfo,
};
pub use store::{FeatureStore, GeoJsonStore};
