//! Coverage path over a mission area.

use tracing::warn;

use super::Planner;
use crate::agent::{AgentId, AgentState};
use crate::error::{provider_err, PlanError};
use crate::geom::{GeometryProvider, Path, Point, Tile, Zoom};
use crate::mission::Mission;
use crate::tiles::reduce_columns;

/// Back-and-forth reordering: swap entries `i` and `i + 1` for every
/// `i ≡ 1 (mod 3)` that is not the last index.
pub fn boustrophedon(mut tiles: Vec<Tile>) -> Vec<Tile> {
    let n = tiles.len();
    for i in (1..n.saturating_sub(1)).step_by(3) {
        tiles.swap(i, i + 1);
    }
    tiles
}

impl<P: GeometryProvider> Planner<P> {
    /// Path through the centers of the mission's reduced tiles, starting at
    /// the end closer to the agent.
    ///
    /// Accepts the collapsed outlines `split` emits for one- or two-column
    /// chunks; such rings cover the tiles under their points and edges.
    /// No tiles gives an empty path; a single tile gives a one-point path.
    pub fn generate_path(
        &self,
        mission: &Mission,
        agent: (&AgentId, &AgentState),
        zoom: Zoom,
    ) -> Result<Path, PlanError> {
        let (id, state) = agent;
        let polygon = mission.geometry.require_outline()?;
        let ordered = self.ordered_cover(polygon, zoom)?;
        let tiles = boustrophedon(reduce_columns(&ordered));
        let mut points: Vec<Point> = tiles.iter().map(|t| self.provider.tile_center(*t)).collect();

        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            warn!(agent = %id, zoom = zoom.0, "mission area covers no tiles");
            return Ok(Path::default());
        };
        let here = state.location();
        let to_start = self
            .provider
            .distance(first, here)
            .map_err(provider_err("distance", format!("agent {id}, path start")))?;
        let to_end = self
            .provider
            .distance(last, here)
            .map_err(provider_err("distance", format!("agent {id}, path end")))?;
        if to_end < to_start {
            points.reverse();
        }
        Ok(Path::new(points))
    }
}
