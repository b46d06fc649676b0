//! Plan a small map area for three agents and print the result.
//!
//! Purpose
//! - Smallest end-to-end run on real map tiles: cover a lon/lat block at zoom 18,
//!   split it across three agents, and sweep each sub-area.
//! - Output is GeoJSON that opens directly in a GIS viewer.
//!
//! Usage
//!   cargo run -p swarmplan --example three_agents
//!
//! References
//! - Code: crates/swarmplan/src/plan/partition.rs::Planner::replan
//! - Code: crates/swarmplan/src/plan/path.rs::Planner::generate_path

use swarmplan::geojson::{feature_collection, path_feature_collection};
use swarmplan::prelude::*;

fn main() {
    let area = Polygon::from_xy(&[
        (10.200, 56.150),
        (10.210, 56.150),
        (10.210, 56.155),
        (10.200, 56.155),
    ])
    .closed();
    let mission = Mission::new("Survey harbour block", MissionType::find(), Geometry::Polygon(area));

    let planner = Planner::new(SlippyTiles::default());
    let (center, area) = planner.mission_area(&mission).expect("mission area");
    println!("Total mission area: ({:.5}, {:.5}) {area:.3e}", center.x, center.y);

    let agents: Vec<(AgentId, AgentState)> = [
        ("ALL", 10.199, 56.149),
        ("YOUR", 10.211, 56.149),
        ("BASE", 10.205, 56.156),
    ]
    .into_iter()
    .map(|(id, x, y)| (AgentId::from(id), AgentState::at(x, y)))
    .collect();

    let zoom = Zoom(18);
    let plan = planner.replan(&mission, &agents, zoom).expect("replan");
    for (id, state) in &agents {
        let sub = &plan[id];
        let path = planner
            .generate_path(sub, (id, state), zoom)
            .expect("coverage path");
        println!("{id}: {}", sub.geometry);
        println!(
            "  area  {}",
            feature_collection(&sub.geometry)
        );
        println!("  path  {} points: {}", path.len(), path_feature_collection(&path));
    }
}
