//! Geometry primitives and the provider seam used by planning.
//!
//! Purpose
//! - Value types (`Point`, `Tile`, `Bound`, `Polygon`, `Geometry`, `Path`).
//! - `GeometryProvider`: tile covering, tile boxes, centroid/area, distance.
//!
//! Conventions
//! - Polygons carry a single exterior ring, no holes.
//! - Covering keeps tiles whose open interior meets the polygon interior;
//!   border-only contact does not count.

mod cover;
pub mod provider;
mod types;
mod util;

pub use provider::{GeometryProvider, PlanarGrid, SlippyTiles, DEFAULT_MAX_TILES};
pub use types::{Bound, Geometry, Path, Point, Polygon, Tile, Zoom};
