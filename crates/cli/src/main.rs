use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use swarmplan::agent::{AgentHolder, AgentId, AgentState};
use swarmplan::geojson::{feature_collection, path_feature_collection};
use swarmplan::geom::{
    Geometry, GeometryProvider, PlanarGrid, SlippyTiles, Zoom, DEFAULT_MAX_TILES,
};
use swarmplan::mission::Mission;
use swarmplan::{MatchPolicy, PlanCfg, Planner, RemainderPolicy};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "swarmplan")]
#[command(about = "Split mission areas across agents and write coverage paths")]
struct Cmd {
    /// Plain Cartesian grid with this cell size at zoom 0 instead of lon/lat map tiles
    #[arg(long, global = true)]
    planar: Option<f64>,

    /// Cap on the number of candidate tiles one covering may visit
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_TILES)]
    max_tiles: usize,

    #[command(subcommand)]
    action: Action,
}

#[derive(Args, Clone, Debug)]
struct MissionArgs {
    /// Mission JSON file
    #[arg(long)]
    mission: PathBuf,
    /// GeoJSON file whose geometry replaces the mission's
    #[arg(long)]
    geojson: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    RunningMaximum,
    Nearest,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RemainderArg {
    Last,
    Spread,
}

#[derive(Subcommand)]
enum Action {
    /// Print the mission centroid and area
    Area {
        #[command(flatten)]
        mission: MissionArgs,
    },
    /// Assign sub-areas to agents and write area/path GeoJSON per agent
    Plan {
        #[command(flatten)]
        mission: MissionArgs,
        /// JSON array of agent holders
        #[arg(long)]
        agents: PathBuf,
        #[arg(long, default_value_t = 18)]
        zoom: u8,
        /// Output directory
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = PolicyArg::RunningMaximum)]
        policy: PolicyArg,
        #[arg(long, value_enum, default_value_t = RemainderArg::Last)]
        remainder: RemainderArg,
    },
    /// Write the outline of the middle third of the mission tiles
    Envelope {
        #[command(flatten)]
        mission: MissionArgs,
        #[arg(long, default_value_t = 18)]
        zoom: u8,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

impl From<PolicyArg> for MatchPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::RunningMaximum => MatchPolicy::RunningMaximum,
            PolicyArg::Nearest => MatchPolicy::Nearest,
        }
    }
}

impl From<RemainderArg> for RemainderPolicy {
    fn from(r: RemainderArg) -> Self {
        match r {
            RemainderArg::Last => RemainderPolicy::LastAbsorbs,
            RemainderArg::Spread => RemainderPolicy::Spread,
        }
    }
}

impl MissionArgs {
    fn load(&self) -> Result<Mission> {
        let text = std::fs::read_to_string(&self.mission)
            .with_context(|| format!("reading {}", self.mission.display()))?;
        let mut mission = Mission::from_json(&text)
            .with_context(|| format!("parsing {}", self.mission.display()))?;
        if let Some(geojson) = &self.geojson {
            mission.load_features(geojson)?;
        }
        Ok(mission)
    }

    fn inputs(&self) -> Vec<String> {
        std::iter::once(&self.mission)
            .chain(self.geojson.as_ref())
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.planar {
        Some(cell) => execute(
            PlanarGrid {
                cell,
                max_tiles: cmd.max_tiles,
            },
            cmd.action,
        ),
        None => execute(SlippyTiles::with_max_tiles(cmd.max_tiles), cmd.action),
    }
}

fn execute<P: GeometryProvider>(provider: P, action: Action) -> Result<()> {
    match action {
        Action::Area { mission } => area(provider, &mission),
        Action::Plan {
            mission,
            agents,
            zoom,
            out,
            policy,
            remainder,
        } => {
            let cfg = PlanCfg {
                match_policy: policy.into(),
                remainder: remainder.into(),
            };
            let written = plan(provider, cfg, &mission, &agents, Zoom(zoom), &out)?;
            tracing::info!(files = written.len(), out = %out.display(), "plan written");
            Ok(())
        }
        Action::Envelope { mission, zoom, out } => envelope(provider, &mission, Zoom(zoom), &out),
        Action::Report => report(),
    }
}

fn area<P: GeometryProvider>(provider: P, args: &MissionArgs) -> Result<()> {
    let mission = args.load()?;
    let (centroid, area) = Planner::new(provider).mission_area(&mission)?;
    let obj = json!({
        "description": mission.description,
        "centroid": [centroid.x, centroid.y],
        "area": area
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn load_agents(path: &Path) -> Result<Vec<(AgentId, AgentState)>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let holders: Vec<AgentHolder> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(holders.iter().map(AgentHolder::entry).collect())
}

/// Replan the mission and write `agentarea-<id>.json` and `agentpath-<id>.json`
/// (plus provenance sidecars) per agent. Returns the artifact paths.
fn plan<P: GeometryProvider>(
    provider: P,
    cfg: PlanCfg,
    args: &MissionArgs,
    agents_path: &Path,
    zoom: Zoom,
    out: &Path,
) -> Result<Vec<PathBuf>> {
    let mission = args.load()?;
    let agents = load_agents(agents_path)?;
    let planner = Planner::with_cfg(provider, cfg);
    let assigned = planner.replan(&mission, &agents, zoom)?;
    tracing::info!(agents = assigned.len(), zoom = zoom.0, "replanned");

    let mut inputs = args.inputs();
    inputs.push(agents_path.to_string_lossy().into_owned());
    let mut written = Vec::new();
    for (id, state) in &agents {
        let Some(sub) = assigned.get(id) else {
            continue;
        };
        let params = json!({
            "agent": id.0,
            "zoom": zoom.0,
            "policy": format!("{:?}", cfg.match_policy),
            "remainder": format!("{:?}", cfg.remainder),
        });

        let area_path = out.join(format!("agentarea-{id}.json"));
        write_json(&area_path, &feature_collection(&sub.geometry))?;
        write_sidecar(
            &area_path,
            Payload::new(params.clone()).with_inputs(inputs.clone()),
        )?;

        let path = planner.generate_path(sub, (id, state), zoom)?;
        let path_path = out.join(format!("agentpath-{id}.json"));
        write_json(&path_path, &path_feature_collection(&path))?;
        write_sidecar(&path_path, Payload::new(params).with_inputs(inputs.clone()))?;

        written.push(area_path);
        written.push(path_path);
    }
    Ok(written)
}

fn envelope<P: GeometryProvider>(
    provider: P,
    args: &MissionArgs,
    zoom: Zoom,
    out: &Path,
) -> Result<()> {
    let mission = args.load()?;
    let outline = Planner::new(provider).generate_envelope(&mission, zoom)?;
    write_json(out, &feature_collection(&Geometry::Polygon(outline)))?;
    write_sidecar(
        out,
        Payload::new(json!({ "zoom": zoom.0 })).with_inputs(args.inputs()),
    )?;
    tracing::info!(out = %out.display(), "envelope written");
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "swarmplan_version": swarmplan::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn write_json(path: &Path, doc: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(path, serde_json::to_vec(doc)?)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarmplan::geom::Polygon;
    use swarmplan::mission::MissionType;
    use swarmplan::PlanError;
    use tempfile::tempdir;

    fn square_mission(dir: &Path, side: f64) -> MissionArgs {
        let area = Polygon::from_xy(&[(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)]).closed();
        let mission = Mission::new("Sweep", MissionType::find(), Geometry::Polygon(area));
        let path = dir.join("mission.json");
        std::fs::write(&path, mission.to_json().unwrap()).unwrap();
        MissionArgs {
            mission: path,
            geojson: None,
        }
    }

    fn agents_file(dir: &Path) -> PathBuf {
        let holders: Vec<AgentHolder> = [("alpha", 0.5, 0.0), ("bravo", 0.5, 4.0)]
            .into_iter()
            .map(|(id, x, y)| {
                let mut h = AgentHolder::default();
                h.agent.uuid = id.to_string();
                h.state = AgentState::at(x, y);
                h
            })
            .collect();
        let path = dir.join("agents.json");
        std::fs::write(&path, serde_json::to_vec(&holders).unwrap()).unwrap();
        path
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn plan_writes_area_and_path_per_agent() {
        let dir = tempdir().unwrap();
        let mission = square_mission(dir.path(), 4.0);
        let agents = agents_file(dir.path());
        let out = dir.path().join("out");
        let written = plan(
            PlanarGrid::new(1.0),
            PlanCfg::default(),
            &mission,
            &agents,
            Zoom(0),
            &out,
        )
        .unwrap();
        assert_eq!(written.len(), 4);
        for id in ["alpha", "bravo"] {
            let area = read_json(&out.join(format!("agentarea-{id}.json")));
            assert_eq!(area["type"], "FeatureCollection");
            assert_eq!(area["features"][0]["geometry"]["type"], "Polygon");
            let path = read_json(&out.join(format!("agentpath-{id}.json")));
            assert_eq!(path["features"][0]["geometry"]["type"], "LineString");
            let sidecar = read_json(&out.join(format!("agentpath-{id}.provenance.json")));
            assert_eq!(sidecar["params"]["agent"], id);
            assert_eq!(sidecar["inputs"].as_array().unwrap().len(), 2);
        }
    }

    #[test]
    fn plan_handles_single_row_sub_areas() {
        let dir = tempdir().unwrap();
        let mission = square_mission(dir.path(), 2.0);
        let agents = agents_file(dir.path());
        let out = dir.path().join("out");
        let written = plan(
            PlanarGrid::new(1.0),
            PlanCfg::default(),
            &mission,
            &agents,
            Zoom(0),
            &out,
        )
        .unwrap();
        assert_eq!(written.len(), 4);
        let path = read_json(&out.join("agentpath-alpha.json"));
        assert_eq!(
            path["features"][0]["geometry"]["coordinates"],
            json!([[0.5, 1.5]])
        );
    }

    #[test]
    fn plan_reports_too_few_tiles() {
        let dir = tempdir().unwrap();
        let mission = square_mission(dir.path(), 1.0);
        let agents = agents_file(dir.path());
        let err = plan(
            PlanarGrid::new(1.0),
            PlanCfg::default(),
            &mission,
            &agents,
            Zoom(0),
            &dir.path().join("out"),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlanError>(),
            Some(PlanError::InsufficientTiles {
                tiles: 1,
                agents: 2
            })
        ));
    }

    #[test]
    fn envelope_writes_outline_with_sidecar() {
        let dir = tempdir().unwrap();
        let mission = square_mission(dir.path(), 3.0);
        let out = dir.path().join("envelope.json");
        envelope(PlanarGrid::new(1.0), &mission, Zoom(0), &out).unwrap();
        let doc = read_json(&out);
        assert_eq!(doc["features"][0]["geometry"]["type"], "Polygon");
        assert!(dir.path().join("envelope.provenance.json").exists());
    }

    #[test]
    fn geojson_override_replaces_mission_geometry() {
        let dir = tempdir().unwrap();
        let mut args = square_mission(dir.path(), 2.0);
        let gj = dir.path().join("area.geojson");
        std::fs::write(
            &gj,
            r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1.0,2.0]}}"#,
        )
        .unwrap();
        args.geojson = Some(gj);
        let mission = args.load().unwrap();
        assert_eq!(mission.geometry.kind(), "Point");
        assert_eq!(args.inputs().len(), 2);
    }

    #[test]
    fn policy_flags_map_onto_cfg() {
        assert_eq!(MatchPolicy::from(PolicyArg::Nearest), MatchPolicy::Nearest);
        assert_eq!(
            RemainderPolicy::from(RemainderArg::Spread),
            RemainderPolicy::Spread
        );
        let cmd = Cmd::try_parse_from([
            "swarmplan",
            "--planar",
            "1.0",
            "plan",
            "--mission",
            "m.json",
            "--agents",
            "a.json",
            "--out",
            "out",
            "--policy",
            "nearest",
        ])
        .unwrap();
        assert_eq!(cmd.planar, Some(1.0));
        assert!(matches!(
            cmd.action,
            Action::Plan {
                zoom: 18,
                policy: PolicyArg::Nearest,
                remainder: RemainderArg::Last,
                ..
            }
        ));
    }
}
