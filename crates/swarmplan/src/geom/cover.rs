//! Shared tile covering over a tile-space bounding box.

use std::collections::HashSet;

use super::types::{Bound, Point, Polygon, Tile, Zoom};
use super::util::{ensure_finite, interior_contains, segment_crosses_open_box, to_geo_polygon};
use crate::error::ProviderError;

/// All tiles whose open interior meets the polygon's interior.
///
/// `to_tile_space` maps a coordinate to fractional (column, row); `bound_of`
/// maps a tile back to its box in coordinate space. A tile is kept when its
/// center lies inside the ring or some ring edge crosses the open tile box,
/// so tiles that only share a border with the polygon are left out.
pub(crate) fn cover_polygon<F, G>(
    polygon: &Polygon,
    zoom: Zoom,
    max_tiles: usize,
    to_tile_space: F,
    bound_of: G,
) -> Result<HashSet<Tile>, ProviderError>
where
    F: Fn(Point) -> Result<Point, ProviderError>,
    G: Fn(Tile) -> Bound,
{
    let ring = polygon.exterior();
    if ring.is_empty() {
        return Err(ProviderError::EmptyGeometry);
    }
    ensure_finite(ring)?;
    let projected = ring
        .iter()
        .map(|p| to_tile_space(*p))
        .collect::<Result<Vec<_>, _>>()?;
    let span = Bound::of_points(&projected).ok_or(ProviderError::EmptyGeometry)?;
    let (x0, x1) = (tile_index(span.min.x)?, tile_index(span.max.x)?);
    let (y0, y1) = (tile_index(span.min.y)?, tile_index(span.max.y)?);
    let too_many = ProviderError::TooManyTiles {
        limit: max_tiles,
        zoom: zoom.0,
    };
    let extent = |lo: i64, hi: i64| hi.checked_sub(lo).and_then(|d| d.checked_add(1));
    let candidates = extent(x0, x1)
        .zip(extent(y0, y1))
        .and_then(|(cols, rows)| cols.checked_mul(rows))
        .ok_or_else(|| too_many.clone())?;
    if candidates > i64::try_from(max_tiles).unwrap_or(i64::MAX) {
        return Err(too_many);
    }

    let closed = polygon.clone().closed();
    let area = to_geo_polygon(&closed);
    let edges: Vec<(Point, Point)> = closed
        .exterior()
        .windows(2)
        .map(|w| (w[0], w[1]))
        .collect();
    let mut out = HashSet::new();
    for y in y0..=y1 {
        for x in x0..=x1 {
            let tile = Tile::new(x, y, zoom);
            let b = bound_of(tile);
            if interior_contains(&area, b.center())
                || edges.iter().any(|&(a, c)| segment_crosses_open_box(a, c, &b))
            {
                out.insert(tile);
            }
        }
    }
    Ok(out)
}

/// Integer column/row of a fractional tile-space coordinate.
fn tile_index(v: f64) -> Result<i64, ProviderError> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if !v.is_finite() || v < i64::MIN as f64 || v >= i64::MAX as f64 {
        return Err(ProviderError::OutOfRange {
            what: "tile index",
            value: v,
        });
    }
    Ok(v.floor() as i64)
}
