//! Error types for lisagrid

use thiserror::Error;

/// Main error type for lisagrid operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid boundary: {reason}")]
    InvalidBoundary { reason: String },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error(
        "Empty grid: no cell of size {cell_size} intersects the boundary \
         (bounds {min_x}, {min_y}, {max_x}, {max_y})"
    )]
    EmptyGrid {
        cell_size: f64,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    #[error("Size mismatch: weights graph has {expected} cells, count vector has {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Unsupported CRS: EPSG:{0}")]
    UnsupportedCrs(u32),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidParameter`] carrying the offending value.
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`Error::InvalidBoundary`].
    pub fn invalid_boundary(reason: impl Into<String>) -> Self {
        Error::InvalidBoundary {
            reason: reason.into(),
        }
    }
}

/// Result type alias for lisagrid operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_mentions_value() {
        let err = Error::invalid_parameter("cell_size", -5.0, "must be strictly positive");
        let msg = err.to_string();
        assert!(msg.contains("cell_size"), "message should name the parameter: {msg}");
        assert!(msg.contains("-5"), "message should carry the value: {msg}");
    }

    #[test]
    fn test_empty_grid_mentions_cell_size() {
        let err = Error::EmptyGrid {
            cell_size: 250.0,
            min_x: 0.0,
            min_y: 0.0,
            max_x: 10.0,
            max_y: 10.0,
        };
        assert!(err.to_string().contains("250"));
    }
}
