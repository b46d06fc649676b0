//! Greedy one-pass assignment of sub-missions to agents.

use std::collections::BTreeMap;

use tracing::debug;

use super::{MatchPolicy, Planner};
use crate::agent::{AgentId, AgentState};
use crate::error::{provider_err, PlanError};
use crate::geom::{GeometryProvider, Point};
use crate::mission::SubMission;

impl MatchPolicy {
    fn initial(self) -> f64 {
        match self {
            MatchPolicy::RunningMaximum => 0.0,
            MatchPolicy::Nearest => f64::INFINITY,
        }
    }

    fn prefers(self, candidate: f64, running: f64) -> bool {
        match self {
            MatchPolicy::RunningMaximum => running < candidate,
            MatchPolicy::Nearest => candidate < running,
        }
    }
}

/// Agents sorted by id; duplicate ids are rejected.
pub(crate) fn sorted_agents(
    agents: &[(AgentId, AgentState)],
) -> Result<Vec<&(AgentId, AgentState)>, PlanError> {
    let mut order: Vec<&(AgentId, AgentState)> = agents.iter().collect();
    order.sort_by(|a, b| a.0.cmp(&b.0));
    if let Some(w) = order.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(PlanError::MalformedInput(format!(
            "duplicate agent id {}",
            w[0].0
        )));
    }
    Ok(order)
}

impl<P: GeometryProvider> Planner<P> {
    /// Assign each agent exactly one sub-mission.
    ///
    /// Agents are visited in ascending id order. Each scans the remaining pool,
    /// measuring from its (x, y) position to every sub-mission centroid, keeps
    /// the candidate chosen by `cfg.match_policy` (ties keep the earlier one),
    /// and removes it from the pool.
    pub fn match_agents(
        &self,
        agents: &[(AgentId, AgentState)],
        sub_missions: Vec<SubMission>,
    ) -> Result<BTreeMap<AgentId, SubMission>, PlanError> {
        if agents.len() != sub_missions.len() {
            return Err(PlanError::MalformedInput(format!(
                "{} agents for {} sub-missions",
                agents.len(),
                sub_missions.len()
            )));
        }
        let order = sorted_agents(agents)?;
        let mut pool: Vec<(Point, SubMission)> = sub_missions
            .into_iter()
            .enumerate()
            .map(|(k, m)| {
                let (centroid, _) = self
                    .provider
                    .centroid_area(&m.geometry)
                    .map_err(provider_err("centroid_area", format!("sub-mission {k}")))?;
                Ok((centroid, m))
            })
            .collect::<Result<_, PlanError>>()?;

        let policy = self.cfg.match_policy;
        let mut assigned = BTreeMap::new();
        for (id, state) in order {
            let location = state.location();
            let mut best = policy.initial();
            let mut pick = 0;
            for (mi, (centroid, _)) in pool.iter().enumerate() {
                let d = self
                    .provider
                    .distance(location, *centroid)
                    .map_err(provider_err("distance", format!("agent {id}, sub-mission {mi}")))?;
                if policy.prefers(d, best) {
                    best = d;
                    pick = mi;
                }
            }
            let (_, m) = pool.remove(pick);
            debug!(agent = %id, distance = best, ?policy, "assigned sub-mission");
            assigned.insert(id.clone(), m);
        }
        if assigned.is_empty() {
            return Err(PlanError::AllocationFailed);
        }
        Ok(assigned)
    }
}
