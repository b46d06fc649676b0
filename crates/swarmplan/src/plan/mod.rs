//! Mission planning: split an area into per-agent sub-areas, assign them,
//! and turn areas into coverage paths.
//!
//! Purpose
//! - `Planner` ties a `GeometryProvider` to a small `PlanCfg` and exposes the
//!   entry points `replan`, `split`, `match_agents`, `generate_envelope`,
//!   `mission_area`, and `generate_path`.
//!
//! Determinism
//! - Agents are always visited in ascending `AgentId` order; tile sets are
//!   sorted before use. Identical inputs give identical outputs.
//!
//! Code cross-refs: `tiles::{sort_tiles, reduce_columns, zigzag_outline}`,
//! `geom::GeometryProvider`.

mod matcher;
mod partition;
mod path;

pub use partition::{chunk_ranges, partition_tiles};
pub use path::boustrophedon;

use crate::error::{provider_err, PlanError};
use crate::geom::{GeometryProvider, Point, Polygon, Tile, Zoom};
use crate::mission::Mission;
use crate::tiles::sort_tiles;

/// Which remaining sub-mission an agent takes during matching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Scan with a zero-initialised running value and take a candidate whenever
    /// its distance exceeds it: the farthest remaining sub-mission wins.
    #[default]
    RunningMaximum,
    /// Take the closest remaining sub-mission.
    Nearest,
}

/// Where the `total % agents` leftover tiles go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// Last chunk takes all of them.
    #[default]
    LastAbsorbs,
    /// The first `total % agents` chunks take one each.
    Spread,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlanCfg {
    pub match_policy: MatchPolicy,
    pub remainder: RemainderPolicy,
}

/// Planning entry points over a geometry provider.
#[derive(Clone, Debug)]
pub struct Planner<P> {
    provider: P,
    cfg: PlanCfg,
}

impl<P: GeometryProvider> Planner<P> {
    pub fn new(provider: P) -> Self {
        Self::with_cfg(provider, PlanCfg::default())
    }

    pub fn with_cfg(provider: P, cfg: PlanCfg) -> Self {
        Self { provider, cfg }
    }

    #[inline]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[inline]
    pub fn cfg(&self) -> PlanCfg {
        self.cfg
    }

    /// Centroid and area of the mission geometry (any kind).
    pub fn mission_area(&self, mission: &Mission) -> Result<(Point, f64), PlanError> {
        self.provider
            .centroid_area(&mission.geometry)
            .map_err(provider_err("centroid_area", "mission area"))
    }

    /// Cover `polygon` at `zoom` and sort the tiles row-major.
    pub fn ordered_cover(&self, polygon: &Polygon, zoom: Zoom) -> Result<Vec<Tile>, PlanError> {
        let tiles = self
            .provider
            .tile_cover(polygon, zoom)
            .map_err(provider_err("tile_cover", format!("zoom {zoom}")))?;
        Ok(sort_tiles(tiles))
    }
}
