//! Contiguous tile chunks and the mission-level split/replan entry points.

use std::collections::BTreeMap;
use std::ops::Range;

use tracing::debug;

use super::matcher::sorted_agents;
use super::{Planner, RemainderPolicy};
use crate::agent::{AgentId, AgentState};
use crate::error::PlanError;
use crate::geom::{Geometry, GeometryProvider, Polygon, Tile, Zoom};
use crate::mission::{Mission, SubMission};
use crate::tiles::{reduce_columns, zigzag_outline};

/// Index ranges of `agents` contiguous chunks over `total` ordered tiles.
///
/// Every chunk gets `total / agents` tiles; the remainder is placed per `policy`.
/// Fails when there are no agents, no tiles, or fewer tiles than agents.
pub fn chunk_ranges(
    total: usize,
    agents: usize,
    policy: RemainderPolicy,
) -> Result<Vec<Range<usize>>, PlanError> {
    if agents == 0 || total == 0 || total < agents {
        return Err(PlanError::InsufficientTiles {
            tiles: total,
            agents,
        });
    }
    let size = total / agents;
    let extra = total % agents;
    let ranges = match policy {
        RemainderPolicy::LastAbsorbs => (0..agents)
            .map(|i| {
                let start = i * size;
                let end = if i == agents - 1 { total } else { start + size };
                start..end
            })
            .collect(),
        RemainderPolicy::Spread => {
            let mut start = 0;
            (0..agents)
                .map(|i| {
                    let len = size + usize::from(i < extra);
                    let r = start..start + len;
                    start += len;
                    r
                })
                .collect()
        }
    };
    Ok(ranges)
}

/// Slice an ordered tile list into per-agent chunks.
pub fn partition_tiles(
    ordered: &[Tile],
    agents: usize,
    policy: RemainderPolicy,
) -> Result<Vec<&[Tile]>, PlanError> {
    Ok(chunk_ranges(ordered.len(), agents, policy)?
        .into_iter()
        .map(|r| &ordered[r])
        .collect())
}

impl<P: GeometryProvider> Planner<P> {
    /// Split a mission into `agent_count` sub-missions, one per contiguous tile
    /// chunk, in chunk order. Each sub-mission's geometry is the zigzag outline
    /// of its reduced chunk; all other fields are copied.
    pub fn split(
        &self,
        mission: &Mission,
        agent_count: usize,
        zoom: Zoom,
    ) -> Result<Vec<SubMission>, PlanError> {
        let polygon = mission.geometry.require_polygon()?;
        let ordered = self.ordered_cover(polygon, zoom)?;
        let chunks = partition_tiles(&ordered, agent_count, self.cfg.remainder)?;
        debug!(
            tiles = ordered.len(),
            agents = agent_count,
            zoom = zoom.0,
            "split mission"
        );
        Ok(chunks
            .into_iter()
            .map(|chunk| {
                let outline = zigzag_outline(&reduce_columns(chunk), &self.provider);
                mission.with_geometry(Geometry::Polygon(outline))
            })
            .collect())
    }

    /// Split the mission across `agents` and assign one sub-mission to each.
    pub fn replan(
        &self,
        mission: &Mission,
        agents: &[(AgentId, AgentState)],
        zoom: Zoom,
    ) -> Result<BTreeMap<AgentId, SubMission>, PlanError> {
        let count = sorted_agents(agents)?.len();
        let subs = self.split(mission, count, zoom)?;
        self.match_agents(agents, subs)
    }

    /// Outline of the middle third of the mission's ordered tiles.
    /// Inspection aid; fails when that third is empty (fewer than 3 tiles).
    pub fn generate_envelope(&self, mission: &Mission, zoom: Zoom) -> Result<Polygon, PlanError> {
        let polygon = mission.geometry.require_polygon()?;
        let ordered = self.ordered_cover(polygon, zoom)?;
        let third = ordered.len() / 3;
        let middle = &ordered[third..2 * third];
        if middle.is_empty() {
            // one slice per third
            return Err(PlanError::InsufficientTiles {
                tiles: ordered.len(),
                agents: 3,
            });
        }
        Ok(zigzag_outline(&reduce_columns(middle), &self.provider))
    }
}
