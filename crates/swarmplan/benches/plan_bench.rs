//! Criterion benchmarks for the planning hot paths on a planar grid.
//! Focus sizes: square areas with side s in {8, 32, 128} cells, 4 agents.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p swarmplan

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use swarmplan::prelude::*;

fn square_mission(side: f64) -> Mission {
    let area = Polygon::from_xy(&[(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)]).closed();
    Mission::new("bench", MissionType::find(), Geometry::Polygon(area))
}

fn scattered_agents(n: usize, side: f64, seed: u64) -> Vec<(AgentId, AgentState)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let state = AgentState::at(rng.gen_range(0.0..side), rng.gen_range(0.0..side));
            (AgentId::from(format!("agent-{i}").as_str()), state)
        })
        .collect()
}

fn bench_plan(c: &mut Criterion) {
    let planner = Planner::new(PlanarGrid::new(1.0));
    let zoom = Zoom(0);
    let mut group = c.benchmark_group("plan");
    for &s in &[8usize, 32, 128] {
        let side = s as f64;
        group.bench_with_input(BenchmarkId::new("replan", s), &side, |b, &side| {
            b.iter_batched(
                || (square_mission(side), scattered_agents(4, side, 43)),
                |(mission, agents)| {
                    let _res = planner.replan(&mission, &agents, zoom);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("generate_path", s), &side, |b, &side| {
            let agents = scattered_agents(1, side, 44);
            b.iter_batched(
                || square_mission(side),
                |mission| {
                    let (id, state) = &agents[0];
                    let _path = planner.generate_path(&mission, (id, state), zoom).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("tile_cover", s), &side, |b, &side| {
            let area = Polygon::from_xy(&[(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)]);
            b.iter(|| {
                let _tiles = planner.provider().tile_cover(&area, zoom).unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
