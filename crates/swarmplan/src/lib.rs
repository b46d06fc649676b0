//! Tile-based coverage planning for agent swarms.
//!
//! A mission names a polygonal area. The planner covers that area with grid
//! tiles, cuts the row-major tile order into one contiguous chunk per agent,
//! outlines each chunk, and hands every agent one sub-area. Paths are
//! back-and-forth sweeps through the tile centers of an area.
//!
//! Layout
//! - `geom`: points, polygons, tiles, and the `GeometryProvider` seam
//!   (`SlippyTiles` for lon/lat, `PlanarGrid` for plain coordinates).
//! - `tiles`: ordering, column reduction, and zigzag outlines.
//! - `plan`: `Planner` with `replan`, `split`, `match_agents`, `generate_path`.
//! - `mission`, `agent`: wire records (PascalCase JSON).
//! - `geojson`: reading and writing GeoJSON features.
//!
//! API Policy
//! - Project-internal; no stable public API.

pub mod agent;
pub mod error;
pub mod geojson;
pub mod geom;
pub mod mission;
pub mod plan;
pub mod tiles;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{PlanError, ProviderError};
pub use plan::{MatchPolicy, PlanCfg, Planner, RemainderPolicy};

/// Common exports for callers.
pub mod prelude {
    pub use crate::agent::{Agent, AgentHolder, AgentId, AgentState, AgentType};
    pub use crate::error::{PlanError, ProviderError};
    pub use crate::geom::{
        Bound, Geometry, GeometryProvider, Path, PlanarGrid, Point, Polygon, SlippyTiles, Tile,
        Zoom,
    };
    pub use crate::mission::{Mission, MissionType, SubMission};
    pub use crate::plan::{MatchPolicy, PlanCfg, Planner, RemainderPolicy};
}
