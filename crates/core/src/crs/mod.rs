//! Coordinate reference systems and reprojection
//!
//! The analysis runs in a projected, metric frame. Input stored in WGS84 is
//! brought into a UTM zone with [`Projection`] and results are taken back
//! the same way.

mod utm;

use geo::{Coord, MapCoords};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::vector::Point;

pub use utm::{parse_utm_epsg, utm_to_wgs84, wgs84_to_utm};

/// Coordinate reference system identified by its EPSG code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CRS {
    epsg: u32,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self { epsg: code }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// UTM zone and hemisphere (`true` = north) for EPSG 326xx / 327xx
    pub fn utm_zone(&self) -> Option<(u32, bool)> {
        parse_utm_epsg(self.epsg)
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// Transformation between the storage frame and the analysis frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Data is already in the metric analysis frame
    #[default]
    Identity,
    /// Storage in WGS84 (lon, lat), analysis in a UTM zone
    Utm { zone: u32, north: bool },
}

impl Projection {
    /// Projection from WGS84 into the given analysis CRS.
    ///
    /// WGS84 itself is rejected because degrees are not a metric frame.
    pub fn to_crs(target: CRS) -> Result<Self> {
        match target.utm_zone() {
            Some((zone, north)) => Ok(Projection::Utm { zone, north }),
            None => Err(Error::UnsupportedCrs(target.epsg())),
        }
    }

    /// Analysis CRS, when known
    pub fn target(&self) -> Option<CRS> {
        match *self {
            Projection::Identity => None,
            Projection::Utm { zone, north } => {
                Some(CRS::from_epsg(if north { 32600 } else { 32700 } + zone))
            }
        }
    }

    /// Storage frame → analysis frame
    pub fn forward(&self, c: Coord<f64>) -> Coord<f64> {
        match *self {
            Projection::Identity => c,
            Projection::Utm { zone, north } => {
                let (x, y) = wgs84_to_utm(c.x, c.y, zone, north);
                Coord { x, y }
            }
        }
    }

    /// Analysis frame → storage frame
    pub fn inverse(&self, c: Coord<f64>) -> Coord<f64> {
        match *self {
            Projection::Identity => c,
            Projection::Utm { zone, north } => {
                let (x, y) = utm_to_wgs84(c.x, c.y, zone, north);
                Coord { x, y }
            }
        }
    }

    /// Storage frame → analysis frame, for a single point
    pub fn forward_point(&self, p: Point) -> Point {
        self.forward(Coord { x: p.x, y: p.y }).into()
    }

    pub fn project<G>(&self, geom: &G) -> G
    where
        G: MapCoords<f64, f64, Output = G>,
    {
        geom.map_coords(|c| self.forward(c))
    }

    pub fn unproject<G>(&self, geom: &G) -> G
    where
        G: MapCoords<f64, f64, Output = G>,
    {
        geom.map_coords(|c| self.inverse(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Polygon;

    #[test]
    fn test_crs_epsg() {
        let crs = CRS::from_epsg(32719);
        assert_eq!(crs.epsg(), 32719);
        assert_eq!(crs.to_string(), "EPSG:32719");
        assert_eq!(crs.utm_zone(), Some((19, false)));
        assert_eq!(CRS::default(), CRS::wgs84());
    }

    #[test]
    fn test_projection_rejects_geographic_target() {
        assert!(matches!(
            Projection::to_crs(CRS::wgs84()),
            Err(Error::UnsupportedCrs(4326))
        ));
    }

    #[test]
    fn test_projection_target_roundtrip() {
        let p = Projection::to_crs(CRS::from_epsg(32719)).unwrap();
        assert_eq!(p.target(), Some(CRS::from_epsg(32719)));
        assert_eq!(Projection::Identity.target(), None);
    }

    #[test]
    fn test_forward_point() {
        let p = Point::new(-70.71, -33.61);
        assert_eq!(Projection::Identity.forward_point(p), p);
        let utm = Projection::Utm { zone: 19, north: false }.forward_point(p);
        assert!(utm.x > 300_000.0 && utm.x < 400_000.0, "easting {}", utm.x);
        assert!(utm.y > 6_200_000.0 && utm.y < 6_300_000.0, "northing {}", utm.y);
    }

    #[test]
    fn test_project_polygon_into_metres() {
        // Small square near San Bernardo, Chile
        let poly: Polygon<f64> = geo::Rect::new(
            Coord { x: -70.72, y: -33.62 },
            Coord { x: -70.70, y: -33.60 },
        )
        .to_polygon();
        let p = Projection::to_crs(CRS::from_epsg(32719)).unwrap();
        let projected = p.project(&poly);
        let back = p.unproject(&projected);

        for c in projected.exterior().coords() {
            assert!(c.x > 100_000.0 && c.y > 6_000_000.0, "not metric: {:?}", c);
        }
        for (a, b) in poly.exterior().coords().zip(back.exterior().coords()) {
            assert!((a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6);
        }
    }
}
