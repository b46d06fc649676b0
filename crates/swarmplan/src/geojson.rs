//! GeoJSON in and out.
//!
//! Input accepts a Feature, a FeatureCollection holding exactly one feature,
//! or a bare geometry object. Supported geometry types: Point, LineString,
//! Polygon, MultiPolygon. Polygon holes are dropped.

use std::fs;
use std::path::Path as FsPath;

use serde_json::{json, Value};

use crate::error::PlanError;
use crate::geom::{Geometry, Path, Point, Polygon};

/// Polygon coordinates as nested arrays: rings of positions.
pub(crate) type Rings = Vec<Vec<Vec<f64>>>;

pub fn load_geometry(path: impl AsRef<FsPath>) -> Result<Geometry, PlanError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PlanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_geometry(&text)
}

pub fn parse_geometry(text: &str) -> Result<Geometry, PlanError> {
    let doc: Value = serde_json::from_str(text)?;
    match type_of(&doc)? {
        "Feature" => feature_geometry(&doc),
        "FeatureCollection" => {
            let features = doc
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| PlanError::GeoJson("FeatureCollection without features".into()))?;
            match features.as_slice() {
                [only] => feature_geometry(only),
                other => Err(PlanError::GeoJson(format!(
                    "must have 1 feature, found {}",
                    other.len()
                ))),
            }
        }
        _ => geometry_from_value(&doc),
    }
}

fn type_of(v: &Value) -> Result<&str, PlanError> {
    v.get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| PlanError::GeoJson("object without \"type\"".into()))
}

fn feature_geometry(feature: &Value) -> Result<Geometry, PlanError> {
    let g = feature
        .get("geometry")
        .filter(|g| !g.is_null())
        .ok_or_else(|| PlanError::GeoJson("feature without geometry".into()))?;
    geometry_from_value(g)
}

pub fn geometry_from_value(v: &Value) -> Result<Geometry, PlanError> {
    let kind = type_of(v)?;
    let coords = v
        .get("coordinates")
        .cloned()
        .ok_or_else(|| PlanError::GeoJson(format!("{kind} without coordinates")))?;
    let bad = |e: String| PlanError::GeoJson(format!("{kind}: {e}"));
    match kind {
        "Point" => {
            let pos: Vec<f64> = serde_json::from_value(coords)?;
            Ok(Geometry::Point(position(&pos).map_err(bad)?))
        }
        "LineString" => {
            let pos: Vec<Vec<f64>> = serde_json::from_value(coords)?;
            let pts = pos
                .iter()
                .map(|p| position(p))
                .collect::<Result<Vec<_>, _>>()
                .map_err(bad)?;
            Ok(Geometry::LineString(pts))
        }
        "Polygon" => {
            let rings: Rings = serde_json::from_value(coords)?;
            Ok(Geometry::Polygon(polygon_from_rings(rings).map_err(bad)?))
        }
        "MultiPolygon" => {
            let polys: Vec<Rings> = serde_json::from_value(coords)?;
            let polys = polys
                .into_iter()
                .map(polygon_from_rings)
                .collect::<Result<Vec<_>, _>>()
                .map_err(bad)?;
            Ok(Geometry::MultiPolygon(polys))
        }
        other => Err(PlanError::GeoJson(format!("unsupported geometry type {other}"))),
    }
}

fn position(p: &[f64]) -> Result<Point, String> {
    match p {
        [x, y, ..] => Ok(Point::new(*x, *y)),
        _ => Err(format!("position needs 2 coordinates, got {}", p.len())),
    }
}

/// Exterior ring of nested coordinates; interior rings are dropped.
pub(crate) fn polygon_from_rings(rings: Rings) -> Result<Polygon, String> {
    let mut rings = rings.into_iter();
    let exterior = rings.next().ok_or_else(|| "polygon without rings".to_string())?;
    let holes = rings.count();
    if holes > 0 {
        tracing::warn!(holes, "dropping polygon holes");
    }
    let pts = exterior
        .iter()
        .map(|p| position(p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(pts))
}

pub(crate) fn polygon_rings(p: &Polygon) -> Rings {
    vec![p.exterior().iter().map(|q| vec![q.x, q.y]).collect()]
}

fn points_value(pts: &[Point]) -> Value {
    Value::Array(pts.iter().map(|p| json!([p.x, p.y])).collect())
}

pub fn geometry_to_value(g: &Geometry) -> Value {
    match g {
        Geometry::Point(p) => json!({"type": "Point", "coordinates": [p.x, p.y]}),
        Geometry::LineString(pts) => json!({"type": "LineString", "coordinates": points_value(pts)}),
        Geometry::Polygon(p) => {
            json!({"type": "Polygon", "coordinates": [points_value(p.exterior())]})
        }
        Geometry::MultiPolygon(ps) => json!({
            "type": "MultiPolygon",
            "coordinates": ps.iter().map(|p| json!([points_value(p.exterior())])).collect::<Vec<_>>(),
        }),
    }
}

fn collection_of(geometry: Value) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{"type": "Feature", "geometry": geometry, "properties": {}}],
    })
}

/// Single-feature collection holding `g`.
pub fn feature_collection(g: &Geometry) -> Value {
    collection_of(geometry_to_value(g))
}

/// Single-feature collection holding the path as a LineString.
pub fn path_feature_collection(path: &Path) -> Value {
    collection_of(json!({"type": "LineString", "coordinates": points_value(&path.points)}))
}
