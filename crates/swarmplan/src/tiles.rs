//! Tile ordering, column envelope reduction, and zigzag outlines.
//!
//! Pipeline pieces shared by partitioning and path generation:
//! - `sort_tiles`: row-major total order, independent of set enumeration.
//! - `reduce_columns`: run-length reduction keeping the ends of same-column runs.
//! - `zigzag_outline`: even entries forward, odd entries backward, closed ring.

use crate::geom::{GeometryProvider, Point, Polygon, Tile};

/// Sort tiles by (row, column) ascending.
pub fn sort_tiles(tiles: impl IntoIterator<Item = Tile>) -> Vec<Tile> {
    let mut out: Vec<Tile> = tiles.into_iter().collect();
    out.sort_by_key(Tile::row_major_key);
    out
}

/// Reduce an ordered tile range to column representatives.
///
/// A tile whose column differs from the previous tile's starts a new
/// representative. Within a run of one column, the third and later tiles with
/// non-decreasing row replace the last representative, so a run keeps its
/// first and last tile.
pub fn reduce_columns(ordered: &[Tile]) -> Vec<Tile> {
    let mut reduced: Vec<Tile> = Vec::with_capacity(ordered.len());
    let mut previous: Option<Tile> = None;
    let mut pre_previous: Option<Tile> = None;
    for &t in ordered {
        match (pre_previous, previous) {
            (_, Some(prev)) if prev.x != t.x => reduced.push(t),
            (Some(pp), Some(prev)) if pp.x == t.x && t.y >= prev.y => {
                if let Some(last) = reduced.last_mut() {
                    *last = t;
                }
            }
            _ => reduced.push(t),
        }
        pre_previous = previous;
        previous = Some(t);
    }
    reduced
}

/// Closed outline through tile centers: indices 0, 2, 4, … forward, then
/// …, 5, 3, 1 backward (the last index skipped both ways), then the first again.
pub fn zigzag_outline<P: GeometryProvider + ?Sized>(reduced: &[Tile], provider: &P) -> Polygon {
    let last = reduced.len().saturating_sub(1);
    let forward = reduced
        .iter()
        .enumerate()
        .filter(|&(i, _)| i % 2 == 0 && i < last);
    let backward = reduced
        .iter()
        .enumerate()
        .rev()
        .filter(|&(i, _)| i % 2 == 1 && i < last);
    let mut ring: Vec<Point> = forward
        .chain(backward)
        .map(|(_, t)| provider.tile_center(*t))
        .collect();
    if let Some(first) = reduced.first() {
        ring.push(provider.tile_center(*first));
    }
    Polygon::new(ring)
}
