//! Planar geometry primitives
//!
//! Points, axis-aligned boxes and boundary polygons in a projected (metric)
//! coordinate frame. Polygons are `geo` types; the predicates needed by the
//! grid builder and the density aggregator live here.

use geo::{
    Area, BooleanOps, BoundingRect, Centroid, Coord, Geometry, Intersects, LineString,
    MultiPolygon, Polygon,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A planar coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(p: geo::Point<f64>) -> Self {
        Self { x: p.x(), y: p.y() }
    }
}

impl From<Coord<f64>> for Point {
    fn from(c: Coord<f64>) -> Self {
        Self { x: c.x, y: c.y }
    }
}

/// Axis-aligned bounding box. All predicates treat the box as closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Boxes share at least one point (edge or corner touch counts)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Boxes share a boundary segment of positive length, or overlap
    pub fn shares_edge(&self, other: &BoundingBox) -> bool {
        let overlap_x = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let overlap_y = self.max_y.min(other.max_y) - self.min_y.max(other.min_y);
        overlap_x >= 0.0 && overlap_y >= 0.0 && (overlap_x > 0.0 || overlap_y > 0.0)
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (self.min_x, self.min_y),
                (self.max_x, self.min_y),
                (self.max_x, self.max_y),
                (self.min_x, self.max_y),
                (self.min_x, self.min_y),
            ]),
            vec![],
        )
    }
}

/// Administrative boundary: the geometric union of one or more polygons.
///
/// Construction rejects empty input, non-finite coordinates and zero-area
/// geometry, so every `Boundary` in circulation is usable for tessellation.
#[derive(Debug, Clone)]
pub struct Boundary {
    union: MultiPolygon<f64>,
    bbox: BoundingBox,
}

impl Boundary {
    /// Build a boundary from its parts, dissolving them into a single union.
    pub fn from_polygons(parts: Vec<Polygon<f64>>) -> Result<Self> {
        if parts.is_empty() {
            return Err(Error::invalid_boundary("no polygons supplied"));
        }

        for (i, part) in parts.iter().enumerate() {
            let finite = part
                .exterior()
                .coords()
                .chain(part.interiors().iter().flat_map(|ring| ring.coords()))
                .all(|c| c.x.is_finite() && c.y.is_finite());
            if !finite {
                return Err(Error::invalid_boundary(format!(
                    "polygon {} has non-finite coordinates",
                    i
                )));
            }
        }

        let mut parts = parts
            .into_iter()
            .filter(|p| p.unsigned_area() > 0.0)
            .collect::<Vec<_>>()
            .into_iter();

        let union = match parts.next() {
            Some(first) => parts.fold(MultiPolygon::new(vec![first]), |acc, p| {
                acc.union(&MultiPolygon::new(vec![p]))
            }),
            None => {
                return Err(Error::invalid_boundary(
                    "boundary has zero area (degenerate polygons only)",
                ))
            }
        };

        Self::from_union(union)
    }

    fn from_union(union: MultiPolygon<f64>) -> Result<Self> {
        let area = union.unsigned_area();
        if area.is_nan() || area <= 0.0 {
            return Err(Error::invalid_boundary(format!(
                "boundary has zero area ({} parts)",
                union.0.len()
            )));
        }

        let rect = union
            .bounding_rect()
            .ok_or_else(|| Error::invalid_boundary("boundary has no extent"))?;

        let bbox = BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y);
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Err(Error::invalid_boundary(format!(
                "boundary extent is degenerate ({} x {})",
                bbox.width(),
                bbox.height()
            )));
        }

        Ok(Self { union, bbox })
    }

    /// Axis-aligned bounding box of the union
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Unsigned area of the union
    pub fn area(&self) -> f64 {
        self.union.unsigned_area()
    }

    /// The dissolved geometry
    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.union
    }

    /// Exact test: the box and the boundary share at least one point.
    ///
    /// The bounding-box overlap is checked first; only boxes passing it pay
    /// for the polygon intersection test.
    pub fn intersects_box(&self, bbox: &BoundingBox) -> bool {
        if !self.bbox.intersects(bbox) {
            return false;
        }
        self.union.intersects(&bbox.to_polygon())
    }
}

/// Representative location of a feature geometry.
///
/// Points map to themselves; every other geometry is reduced to its centroid.
pub fn representative_point(geom: &Geometry<f64>) -> Option<Point> {
    let p = match geom {
        Geometry::Point(p) => Some(*p),
        Geometry::Line(l) => Some(l.centroid()),
        Geometry::LineString(ls) => ls.centroid(),
        Geometry::Polygon(p) => p.centroid(),
        Geometry::MultiPoint(mp) => mp.centroid(),
        Geometry::MultiLineString(mls) => mls.centroid(),
        Geometry::MultiPolygon(mp) => mp.centroid(),
        Geometry::Rect(r) => Some(r.centroid()),
        Geometry::Triangle(t) => Some(t.centroid()),
        Geometry::GeometryCollection(gc) => gc.centroid(),
    };
    p.map(Point::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, side: f64) -> Polygon<f64> {
        BoundingBox::new(x0, y0, x0 + side, y0 + side).to_polygon()
    }

    #[test]
    fn test_bbox_touching_corner_intersects() {
        let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let b = BoundingBox::new(1.0, 1.0, 2.0, 2.0);
        assert!(a.intersects(&b));
        assert!(!a.shares_edge(&b), "corner touch is not an edge");
    }

    #[test]
    fn test_bbox_shared_edge() {
        let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let b = BoundingBox::new(1.0, 0.0, 2.0, 1.0);
        assert!(a.intersects(&b));
        assert!(a.shares_edge(&b));
    }

    #[test]
    fn test_bbox_disjoint() {
        let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let b = BoundingBox::new(1.5, 0.0, 2.0, 1.0);
        assert!(!a.intersects(&b));
        assert!(!a.shares_edge(&b));
    }

    #[test]
    fn test_boundary_union_of_adjacent_squares() {
        let b = Boundary::from_polygons(vec![square(0.0, 0.0, 10.0), square(10.0, 0.0, 10.0)])
            .unwrap();
        assert!((b.area() - 200.0).abs() < 1e-9, "area was {}", b.area());
        let bbox = b.bbox();
        assert_eq!((bbox.min_x, bbox.max_x), (0.0, 20.0));
    }

    #[test]
    fn test_boundary_empty_rejected() {
        let err = Boundary::from_polygons(vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidBoundary { .. }));
    }

    #[test]
    fn test_boundary_zero_area_rejected() {
        let flat = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (5.0, 0.0), (0.0, 0.0)]),
            vec![],
        );
        let err = Boundary::from_polygons(vec![flat]).unwrap_err();
        assert!(matches!(err, Error::InvalidBoundary { .. }));
    }

    #[test]
    fn test_boundary_nan_rejected() {
        let bad = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (f64::NAN, 0.0), (5.0, 5.0), (0.0, 0.0)]),
            vec![],
        );
        assert!(Boundary::from_polygons(vec![bad]).is_err());
    }

    #[test]
    fn test_intersects_box_exact_for_triangle() {
        // Right triangle with the hypotenuse from (10,0) to (0,10)
        let tri = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (0.0, 0.0)]),
            vec![],
        );
        let b = Boundary::from_polygons(vec![tri]).unwrap();
        // Upper-right box overlaps the bbox but not the triangle
        assert!(!b.intersects_box(&BoundingBox::new(7.0, 7.0, 10.0, 10.0)));
        assert!(b.intersects_box(&BoundingBox::new(0.0, 0.0, 3.0, 3.0)));
    }

    #[test]
    fn test_representative_point_polygon_centroid() {
        let g = Geometry::Polygon(square(0.0, 0.0, 4.0));
        let p = representative_point(&g).unwrap();
        assert!((p.x - 2.0).abs() < 1e-12 && (p.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_representative_point_point() {
        let g = Geometry::Point(geo::Point::new(3.0, -1.0));
        assert_eq!(representative_point(&g), Some(Point::new(3.0, -1.0)));
    }
}
