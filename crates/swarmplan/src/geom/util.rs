//! Helpers at the `geo` boundary plus the one tile-space predicate `geo` lacks.
//!
//! - Centroid, area, containment, and haversine come from `geo`; values are
//!   converted at the module boundary.
//! - `segment_crosses_open_box` stays local: `geo::Intersects` counts border
//!   contact, while covering must ignore tiles that only touch the polygon.

use geo::line_measures::Distance;
use geo::{Area, Centroid, Contains, HaversineMeasure};

use super::types::{Bound, Geometry, Point, Polygon};
use crate::error::ProviderError;

#[inline]
fn point_to_coord(p: Point) -> geo::Coord<f64> {
    geo::Coord { x: p.x, y: p.y }
}

#[inline]
fn geo_to_point(p: geo::Point<f64>) -> Point {
    Point::new(p.x(), p.y())
}

fn line_string(points: &[Point]) -> geo::LineString<f64> {
    geo::LineString::new(points.iter().copied().map(point_to_coord).collect())
}

/// Single-ring `geo` polygon; `geo` closes the ring.
pub(crate) fn to_geo_polygon(p: &Polygon) -> geo::Polygon<f64> {
    geo::Polygon::new(line_string(p.exterior()), Vec::new())
}

/// Strict interior membership; points on the ring do not count.
#[inline]
pub(crate) fn interior_contains(polygon: &geo::Polygon<f64>, p: Point) -> bool {
    polygon.contains(&point_to_coord(p))
}

/// Does segment `a→b` pass through the open interior of `bound`?
///
/// Liang–Barsky clip against the closed box, then test the midpoint of the
/// clipped chord: a chord that only runs along the border or touches a corner
/// stays outside the open box. A zero-length segment counts when its point
/// lies inside the open box.
pub(crate) fn segment_crosses_open_box(a: Point, b: Point, bound: &Bound) -> bool {
    let d = b - a;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let checks = [
        (-d.x, a.x - bound.min.x),
        (d.x, bound.max.x - a.x),
        (-d.y, a.y - bound.min.y),
        (d.y, bound.max.y - a.y),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return false;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return false;
            }
            t1 = t1.min(r);
        }
    }
    if t1 < t0 {
        return false;
    }
    bound.contains_open(a + d * ((t0 + t1) * 0.5))
}

/// Planar centroid and unsigned area for any geometry kind.
///
/// Zero-area polygons fall back to the centroid of their ring edges, then to
/// their single point (`geo`'s dimension reduction). MultiPolygons are
/// area-weighted.
pub(crate) fn planar_centroid_area(g: &Geometry) -> Result<(Point, f64), ProviderError> {
    let (centroid, area) = match g {
        Geometry::Point(p) => {
            ensure_finite(&[*p])?;
            (Some(*p), 0.0)
        }
        Geometry::LineString(pts) => {
            ensure_finite(pts)?;
            (line_string(pts).centroid().map(geo_to_point), 0.0)
        }
        Geometry::Polygon(p) => {
            ensure_finite(p.exterior())?;
            let gp = to_geo_polygon(p);
            (gp.centroid().map(geo_to_point), gp.unsigned_area())
        }
        Geometry::MultiPolygon(ps) => {
            for p in ps {
                ensure_finite(p.exterior())?;
            }
            let gm = geo::MultiPolygon::new(ps.iter().map(to_geo_polygon).collect());
            (gm.centroid().map(geo_to_point), gm.unsigned_area())
        }
    };
    centroid
        .map(|c| (c, area))
        .ok_or(ProviderError::EmptyGeometry)
}

pub(crate) fn ensure_finite(points: &[Point]) -> Result<(), ProviderError> {
    if points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
        Ok(())
    } else {
        Err(ProviderError::NonFinite)
    }
}

/// Great-circle distance between two lon/lat points (degrees) on a sphere.
pub(crate) fn haversine(a: Point, b: Point, radius: f64) -> f64 {
    HaversineMeasure::new(radius).distance(
        geo::Point::from(point_to_coord(a)),
        geo::Point::from(point_to_coord(b)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Bound {
        Bound::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0))
    }

    #[test]
    fn border_segments_do_not_cross() {
        let b = unit_box();
        assert!(!segment_crosses_open_box(Point::new(1.0, -1.0), Point::new(1.0, 2.0), &b));
        assert!(!segment_crosses_open_box(Point::new(-1.0, 0.0), Point::new(3.0, 0.0), &b));
        // touches the corner only
        assert!(!segment_crosses_open_box(Point::new(0.0, 2.0), Point::new(2.0, 0.0), &b));
        assert!(segment_crosses_open_box(Point::new(-1.0, 0.5), Point::new(2.0, 0.5), &b));
        assert!(segment_crosses_open_box(Point::new(0.2, 0.2), Point::new(0.3, 0.3), &b));
    }

    #[test]
    fn zero_length_segment_marks_its_tile() {
        let b = unit_box();
        let c = Point::new(0.5, 0.5);
        assert!(segment_crosses_open_box(c, c, &b));
        let corner = Point::new(1.0, 1.0);
        assert!(!segment_crosses_open_box(corner, corner, &b));
    }

    #[test]
    fn interior_excludes_the_ring() {
        let ring = Polygon::from_xy(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let gp = to_geo_polygon(&ring);
        assert!(interior_contains(&gp, Point::new(2.0, 2.0)));
        assert!(!interior_contains(&gp, Point::new(5.0, 2.0)));
        assert!(!interior_contains(&gp, Point::new(4.0, 2.0)));
    }

    #[test]
    fn square_centroid_and_area() {
        let sq = Polygon::from_xy(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)]);
        let (c, a) = planar_centroid_area(&Geometry::Polygon(sq)).unwrap();
        assert!((c - Point::new(1.0, 1.0)).norm() < 1e-12);
        assert!((a - 4.0).abs() < 1e-12);
    }

    #[test]
    fn multipolygon_centroid_is_area_weighted() {
        let big = Polygon::from_xy(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let small = Polygon::from_xy(&[(10.0, 0.0), (11.0, 0.0), (11.0, 1.0), (10.0, 1.0)]);
        let (c, a) = planar_centroid_area(&Geometry::MultiPolygon(vec![big, small])).unwrap();
        assert!((a - 5.0).abs() < 1e-12);
        // (4 * (1, 1) + 1 * (10.5, 0.5)) / 5
        assert!((c - Point::new(2.9, 0.9)).norm() < 1e-9);
    }

    #[test]
    fn degenerate_rings_fall_back() {
        let seg = Polygon::from_xy(&[(0.0, 0.0), (2.0, 0.0), (0.0, 0.0)]);
        let (c, a) = planar_centroid_area(&Geometry::Polygon(seg)).unwrap();
        assert!((c - Point::new(1.0, 0.0)).norm() < 1e-12);
        assert_eq!(a, 0.0);
        let dot = Polygon::from_xy(&[(3.0, 4.0), (3.0, 4.0)]);
        let (c, _) = planar_centroid_area(&Geometry::Polygon(dot)).unwrap();
        assert!((c - Point::new(3.0, 4.0)).norm() < 1e-12);
        assert_eq!(
            planar_centroid_area(&Geometry::Polygon(Polygon::default())),
            Err(ProviderError::EmptyGeometry)
        );
    }

    #[test]
    fn haversine_one_degree_on_equator() {
        let d = haversine(Point::new(0.0, 0.0), Point::new(1.0, 0.0), 6_378_137.0);
        assert!((d - 111_319.490_793).abs() < 1e-3);
    }
}
