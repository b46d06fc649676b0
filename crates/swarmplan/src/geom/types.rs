//! Geometry value types: points, tiles, bounds, polygons, paths.
//!
//! - `Tile`: integer grid cell; its box and center come from the provider.
//! - `Geometry`: tagged variant; planning accepts only `Polygon` and reports
//!   every other kind as `PlanError::InvalidGeometryKind`.

use std::fmt;

use nalgebra::Vector2;

use crate::error::PlanError;

/// 2D coordinate in the provider's reference frame.
pub type Point = Vector2<f64>;

/// Resolution level of a tile grid; higher is finer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Zoom(pub u8);

impl fmt::Display for Zoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grid cell at column `x`, row `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x: i64,
    pub y: i64,
    pub zoom: Zoom,
}

impl Tile {
    #[inline]
    pub fn new(x: i64, y: i64, zoom: Zoom) -> Self {
        Self { x, y, zoom }
    }
    /// Row-major key: (row, column).
    #[inline]
    pub fn row_major_key(&self) -> (i64, i64) {
        (self.y, self.x)
    }
}

/// Axis-aligned box `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bound {
    pub min: Point,
    pub max: Point,
}

impl Bound {
    #[inline]
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }
    #[inline]
    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }
    /// Strict interior membership; points on the border are outside.
    #[inline]
    pub fn contains_open(&self, p: Point) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
    /// Smallest box containing all points, None for an empty slice.
    pub fn of_points(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let mut b = Bound::new(first, first);
        for p in &points[1..] {
            b.min = b.min.inf(p);
            b.max = b.max.sup(p);
        }
        Some(b)
    }
    /// True if the closed boxes share any point.
    #[inline]
    pub fn intersects(&self, other: &Bound) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Simple polygon given by its exterior ring. No holes.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Polygon {
    ring: Vec<Point>,
}

impl Polygon {
    /// Wrap a ring as-is (no closing, no validation).
    pub fn new(ring: Vec<Point>) -> Self {
        Self { ring }
    }
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }
    /// Append the first point if the ring is open.
    pub fn closed(mut self) -> Self {
        if let (Some(&first), Some(&last)) = (self.ring.first(), self.ring.last()) {
            if first != last {
                self.ring.push(first);
            }
        }
        self
    }
    #[inline]
    pub fn exterior(&self) -> &[Point] {
        &self.ring
    }
    /// Ring without the closing duplicate.
    pub fn vertices(&self) -> &[Point] {
        match (self.ring.first(), self.ring.last()) {
            (Some(first), Some(last)) if self.ring.len() > 1 && first == last => {
                &self.ring[..self.ring.len() - 1]
            }
            _ => &self.ring,
        }
    }
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
    pub fn bound(&self) -> Option<Bound> {
        Bound::of_points(&self.ring)
    }

    /// Check for rings that may be collapsed, such as zigzag outlines of one
    /// or two columns: at least one point, all coordinates finite.
    pub fn validate_outline(&self) -> Result<(), PlanError> {
        if self.ring.is_empty() {
            return Err(PlanError::MalformedInput("polygon has no points".into()));
        }
        if self.ring.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(PlanError::MalformedInput(
                "polygon has non-finite coordinates".into(),
            ));
        }
        Ok(())
    }

    /// Input check: finite coordinates and at least 3 distinct vertices.
    pub fn validate(&self) -> Result<(), PlanError> {
        self.validate_outline()?;
        let mut distinct: Vec<Point> = self.vertices().to_vec();
        distinct.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        distinct.dedup();
        if distinct.len() < 3 {
            return Err(PlanError::MalformedInput(format!(
                "polygon needs at least 3 distinct vertices, got {}",
                distinct.len()
            )));
        }
        Ok(())
    }
}

/// Geometry kinds a mission may carry.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(Vec<Point>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    pub fn as_polygon(&self) -> Result<&Polygon, PlanError> {
        match self {
            Geometry::Polygon(p) => Ok(p),
            other => Err(PlanError::InvalidGeometryKind {
                expected: "Polygon",
                found: other.kind(),
            }),
        }
    }

    /// Polygon with a validated ring; the entry check of mission-level planning calls.
    pub fn require_polygon(&self) -> Result<&Polygon, PlanError> {
        let p = self.as_polygon()?;
        p.validate()?;
        Ok(p)
    }

    /// Polygon whose ring may be collapsed to one or two distinct points.
    pub fn require_outline(&self) -> Result<&Polygon, PlanError> {
        let p = self.as_polygon()?;
        p.validate_outline()?;
        Ok(p)
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Geometry::Polygon(p)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Point(p) => write!(f, "Point({}, {})", p.x, p.y),
            Geometry::LineString(pts) => write!(f, "LineString({} points)", pts.len()),
            Geometry::Polygon(p) => write!(f, "Polygon({} points)", p.exterior().len()),
            Geometry::MultiPolygon(ps) => write!(f, "MultiPolygon({} polygons)", ps.len()),
        }
    }
}

/// Open, directed sequence of points to traverse.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Path {
    pub points: Vec<Point>,
}

impl Path {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }
    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }
}
