//! The geometry provider seam and its two stock implementations.
//!
//! Purpose
//! - Planning needs only four capabilities from geometry: cover a polygon with
//!   tiles, locate a tile, measure centroid/area, and measure distance. They sit
//!   behind `GeometryProvider` so callers can plug in their own frame.
//!
//! Implementations
//! - `SlippyTiles`: Web-Mercator map tiles over lon/lat degrees (x east, y south),
//!   haversine distance, planar centroid over degrees.
//! - `PlanarGrid`: square cells of edge `cell / 2^zoom` in Cartesian units,
//!   Euclidean distance. Handy for reproducible scenarios.

use std::collections::HashSet;
use std::f64::consts::PI;

use super::cover::cover_polygon;
use super::types::{Bound, Geometry, Point, Polygon, Tile, Zoom};
use super::util::{ensure_finite, haversine, planar_centroid_area};
use crate::error::ProviderError;

/// Default cap on the number of candidate tiles a covering may visit.
pub const DEFAULT_MAX_TILES: usize = 1_000_000;

/// Geometry capabilities consumed by the planner.
pub trait GeometryProvider {
    /// Tiles covering `polygon` at `zoom`. Enumeration order is unspecified.
    fn tile_cover(&self, polygon: &Polygon, zoom: Zoom) -> Result<HashSet<Tile>, ProviderError>;

    /// Bounding box of a tile in coordinate space.
    fn tile_bound(&self, tile: Tile) -> Bound;

    #[inline]
    fn tile_center(&self, tile: Tile) -> Point {
        self.tile_bound(tile).center()
    }

    fn centroid_area(&self, geometry: &Geometry) -> Result<(Point, f64), ProviderError>;

    fn distance(&self, a: Point, b: Point) -> Result<f64, ProviderError>;
}

/// Web-Mercator slippy-map tiles.
#[derive(Clone, Copy, Debug)]
pub struct SlippyTiles {
    pub max_tiles: usize,
}

impl SlippyTiles {
    /// Sphere radius used by `distance`, in meters.
    pub const EARTH_RADIUS: f64 = 6_378_137.0;
    /// Latitude limit of the square Mercator world.
    pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;
    pub const MAX_ZOOM: u8 = 30;

    pub fn with_max_tiles(max_tiles: usize) -> Self {
        Self { max_tiles }
    }

    /// Fractional (column, row) of a lon/lat point.
    pub fn tile_space(&self, p: Point, zoom: Zoom) -> Result<Point, ProviderError> {
        check_zoom(zoom)?;
        if !(-180.0..=180.0).contains(&p.x) {
            return Err(ProviderError::OutOfRange {
                what: "longitude",
                value: p.x,
            });
        }
        if !(-90.0..=90.0).contains(&p.y) {
            return Err(ProviderError::OutOfRange {
                what: "latitude",
                value: p.y,
            });
        }
        let n = 2f64.powi(zoom.0 as i32);
        let lat = p.y.clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE).to_radians();
        let fx = (p.x + 180.0) / 360.0 * n;
        let fy = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n;
        // the east and south world edges belong to the last column/row
        let last = n - f64::EPSILON * n;
        Ok(Point::new(fx.min(last), fy.clamp(0.0, last)))
    }

    /// Tile containing a lon/lat point.
    pub fn tile_at(&self, p: Point, zoom: Zoom) -> Result<Tile, ProviderError> {
        let f = self.tile_space(p, zoom)?;
        Ok(Tile::new(f.x.floor() as i64, f.y.floor() as i64, zoom))
    }
}

impl Default for SlippyTiles {
    fn default() -> Self {
        Self {
            max_tiles: DEFAULT_MAX_TILES,
        }
    }
}

fn check_zoom(zoom: Zoom) -> Result<(), ProviderError> {
    if zoom.0 > SlippyTiles::MAX_ZOOM {
        return Err(ProviderError::OutOfRange {
            what: "zoom",
            value: zoom.0 as f64,
        });
    }
    Ok(())
}

fn mercator_row_latitude(row: i64, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * row as f64 / n)).sinh().atan().to_degrees()
}

impl GeometryProvider for SlippyTiles {
    fn tile_cover(&self, polygon: &Polygon, zoom: Zoom) -> Result<HashSet<Tile>, ProviderError> {
        check_zoom(zoom)?;
        cover_polygon(
            polygon,
            zoom,
            self.max_tiles,
            |p| self.tile_space(p, zoom),
            |t| self.tile_bound(t),
        )
    }

    fn tile_bound(&self, tile: Tile) -> Bound {
        let n = 2f64.powi(tile.zoom.0 as i32);
        let lon = |x: i64| x as f64 / n * 360.0 - 180.0;
        Bound::new(
            Point::new(lon(tile.x), mercator_row_latitude(tile.y + 1, n)),
            Point::new(lon(tile.x + 1), mercator_row_latitude(tile.y, n)),
        )
    }

    fn centroid_area(&self, geometry: &Geometry) -> Result<(Point, f64), ProviderError> {
        planar_centroid_area(geometry)
    }

    fn distance(&self, a: Point, b: Point) -> Result<f64, ProviderError> {
        ensure_finite(&[a, b])?;
        Ok(haversine(a, b, Self::EARTH_RADIUS))
    }
}

/// Cartesian grid; tile `(x, y)` spans `[x*s, (x+1)*s] × [y*s, (y+1)*s]`
/// with `s = cell / 2^zoom`.
#[derive(Clone, Copy, Debug)]
pub struct PlanarGrid {
    pub cell: f64,
    pub max_tiles: usize,
}

impl PlanarGrid {
    pub fn new(cell: f64) -> Self {
        Self {
            cell,
            max_tiles: DEFAULT_MAX_TILES,
        }
    }

    #[inline]
    pub fn tile_size(&self, zoom: Zoom) -> f64 {
        self.cell / 2f64.powi(zoom.0 as i32)
    }

    fn checked_size(&self, zoom: Zoom) -> Result<f64, ProviderError> {
        let s = self.tile_size(zoom);
        if !(s.is_finite() && s > 0.0) {
            return Err(ProviderError::OutOfRange {
                what: "tile size",
                value: s,
            });
        }
        Ok(s)
    }
}

impl GeometryProvider for PlanarGrid {
    fn tile_cover(&self, polygon: &Polygon, zoom: Zoom) -> Result<HashSet<Tile>, ProviderError> {
        let s = self.checked_size(zoom)?;
        cover_polygon(
            polygon,
            zoom,
            self.max_tiles,
            |p| Ok(p / s),
            |t| self.tile_bound(t),
        )
    }

    fn tile_bound(&self, tile: Tile) -> Bound {
        let s = self.tile_size(tile.zoom);
        Bound::new(
            Point::new(tile.x as f64 * s, tile.y as f64 * s),
            Point::new((tile.x + 1) as f64 * s, (tile.y + 1) as f64 * s),
        )
    }

    fn centroid_area(&self, geometry: &Geometry) -> Result<(Point, f64), ProviderError> {
        planar_centroid_area(geometry)
    }

    fn distance(&self, a: Point, b: Point) -> Result<f64, ProviderError> {
        ensure_finite(&[a, b])?;
        Ok((a - b).norm())
    }
}
