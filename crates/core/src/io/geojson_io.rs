//! GeoJSON reading and writing
//!
//! Boundaries are read from Polygon / MultiPolygon geometries, point
//! features from any geometry (reduced to a representative point). The
//! labeled grid is written as a FeatureCollection of cell polygons.

use geo::{BoundingRect, Geometry, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::crs::Projection;
use crate::error::{Error, Result};
use crate::lattice::{CountVector, Grid};
use crate::report::AnalysisReport;
use crate::vector::{representative_point, BoundingBox, Point};

/// Feature and geometry counts of a GeoJSON document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoJsonInfo {
    pub features: usize,
    pub polygons: usize,
    pub points: usize,
    pub other: usize,
    /// Features without geometry
    pub empty: usize,
    pub bounds: Option<BoundingBox>,
}

/// Parse a GeoJSON document from a reader
pub fn parse_geojson<R: Read>(reader: R) -> Result<GeoJson> {
    let value: JsonValue = serde_json::from_reader(reader)?;
    Ok(GeoJson::from_json_value(value)?)
}

fn read_geojson<P: AsRef<Path>>(path: P) -> Result<GeoJson> {
    let file = File::open(path.as_ref())?;
    parse_geojson(BufReader::new(file))
}

/// Every geometry in the document, in document order. Null geometries are
/// skipped.
pub fn geometries(gj: GeoJson) -> Result<Vec<Geometry<f64>>> {
    let raw: Vec<geojson::Geometry> = match gj {
        GeoJson::Geometry(g) => vec![g],
        GeoJson::Feature(f) => f.geometry.into_iter().collect(),
        GeoJson::FeatureCollection(fc) => {
            fc.features.into_iter().filter_map(|f| f.geometry).collect()
        }
    };

    raw.into_iter()
        .map(|g| Geometry::<f64>::try_from(g).map_err(Error::from))
        .collect()
}

fn push_polygons(geom: Geometry<f64>, out: &mut Vec<Polygon<f64>>) {
    match geom {
        Geometry::Polygon(p) => out.push(p),
        Geometry::MultiPolygon(mp) => out.extend(mp.0),
        Geometry::Rect(r) => out.push(r.to_polygon()),
        Geometry::GeometryCollection(gc) => {
            for g in gc.0 {
                push_polygons(g, out);
            }
        }
        _ => {}
    }
}

/// Boundary polygons of a GeoJSON document; non-areal geometries are ignored
pub fn boundary_polygons(gj: GeoJson) -> Result<Vec<Polygon<f64>>> {
    let mut polygons = Vec::new();
    for g in geometries(gj)? {
        push_polygons(g, &mut polygons);
    }
    Ok(polygons)
}

/// Representative point of every feature geometry
pub fn feature_points(gj: GeoJson) -> Result<Vec<Point>> {
    Ok(geometries(gj)?
        .iter()
        .filter_map(representative_point)
        .collect())
}

/// Read boundary polygons from a GeoJSON file
pub fn read_boundary<P: AsRef<Path>>(path: P) -> Result<Vec<Polygon<f64>>> {
    boundary_polygons(read_geojson(path)?)
}

/// Read point features from a GeoJSON file
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Vec<Point>> {
    feature_points(read_geojson(path)?)
}

/// Count features and geometry kinds in a GeoJSON file
pub fn inspect_geojson<P: AsRef<Path>>(path: P) -> Result<GeoJsonInfo> {
    let gj = read_geojson(path)?;
    let features = match &gj {
        GeoJson::FeatureCollection(fc) => fc.features.len(),
        _ => 1,
    };
    let geoms = geometries(gj)?;

    let mut info = GeoJsonInfo {
        features,
        empty: features.saturating_sub(geoms.len()),
        ..Default::default()
    };

    for g in &geoms {
        match g {
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) => {
                info.polygons += 1
            }
            Geometry::Point(_) | Geometry::MultiPoint(_) => info.points += 1,
            _ => info.other += 1,
        }
        if let Some(rect) = g.bounding_rect() {
            let bb = BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y);
            info.bounds = Some(match info.bounds {
                None => bb,
                Some(acc) => BoundingBox::new(
                    acc.min_x.min(bb.min_x),
                    acc.min_y.min(bb.min_y),
                    acc.max_x.max(bb.max_x),
                    acc.max_y.max(bb.max_y),
                ),
            });
        }
    }

    Ok(info)
}

fn cell_feature(bbox: &BoundingBox, properties: JsonObject, projection: &Projection) -> Feature {
    let polygon = projection.unproject(&bbox.to_polygon());
    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(&polygon))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Labeled grid as a FeatureCollection.
///
/// Each cell carries `cell_index`, `count`, `neighbor_count`, `local_i`,
/// `local_p_value` and `cluster_label`; the global statistic and run parameters are stored as
/// foreign members of the collection.
pub fn report_to_geojson(report: &AnalysisReport, projection: &Projection) -> FeatureCollection {
    let features = report
        .cells
        .iter()
        .map(|rec| {
            let mut props = JsonObject::new();
            props.insert("cell_index".into(), JsonValue::from(rec.cell_index));
            props.insert("count".into(), JsonValue::from(rec.count));
            props.insert("neighbor_count".into(), JsonValue::from(rec.neighbor_count));
            props.insert("local_i".into(), JsonValue::from(rec.local_i));
            props.insert("local_p_value".into(), JsonValue::from(rec.local_p_value));
            props.insert("cluster_label".into(), JsonValue::from(rec.cluster_label.as_str()));
            cell_feature(&rec.cell_geometry, props, projection)
        })
        .collect();

    let mut foreign = JsonObject::new();
    foreign.insert("global_i".into(), JsonValue::from(report.global.i));
    foreign.insert("global_p_value".into(), JsonValue::from(report.global.p_value));
    foreign.insert("expected_i".into(), JsonValue::from(report.global.expected));
    foreign.insert("z_sim".into(), JsonValue::from(report.global.z_sim));
    foreign.insert("permutations".into(), JsonValue::from(report.global.permutations));
    foreign.insert("cell_size".into(), JsonValue::from(report.cell_size));
    foreign.insert("alpha".into(), JsonValue::from(report.alpha));
    foreign.insert("seed".into(), JsonValue::from(report.seed));

    let mut summary = JsonObject::new();
    summary.insert("hh".into(), JsonValue::from(report.summary.hh));
    summary.insert("ll".into(), JsonValue::from(report.summary.ll));
    summary.insert("hl".into(), JsonValue::from(report.summary.hl));
    summary.insert("lh".into(), JsonValue::from(report.summary.lh));
    summary.insert("ns".into(), JsonValue::from(report.summary.ns));
    foreign.insert("summary".into(), JsonValue::Object(summary));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign),
    }
}

/// Grid cells (optionally with counts) as a FeatureCollection
pub fn grid_to_geojson(
    grid: &Grid,
    counts: Option<&CountVector>,
    projection: &Projection,
) -> FeatureCollection {
    let features = grid
        .iter()
        .map(|cell| {
            let mut props = JsonObject::new();
            props.insert("cell_index".into(), JsonValue::from(cell.index));
            props.insert("row".into(), JsonValue::from(cell.row));
            props.insert("col".into(), JsonValue::from(cell.col));
            if let Some(count) = counts.and_then(|c| c.get(cell.index)) {
                props.insert("count".into(), JsonValue::from(count));
            }
            cell_feature(&cell.bbox(), props, projection)
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Serialize a FeatureCollection to a writer
pub fn write_feature_collection<W: Write>(fc: &FeatureCollection, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, fc)?;
    writer.flush()?;
    Ok(())
}

/// Write the labeled grid to a GeoJSON file
pub fn write_report_geojson<P: AsRef<Path>>(
    report: &AnalysisReport,
    path: P,
    projection: &Projection,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_feature_collection(&report_to_geojson(report, projection), file)
}
