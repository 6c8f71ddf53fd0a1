use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bevy::math::Vec2;

use brickfield::agent::{follow_step, steer_toward, Agent};
use brickfield::settings::{AgentSettings, TerrainSettings, WorldSettings};
use brickfield::terrain::HeightField;
use brickfield::world::{build_world, ColumnRng};

/// Sample the height field across a dense grid.
fn bench_height_sampling(c: &mut Criterion) {
    let field = HeightField::new(&TerrainSettings::default());

    c.bench_function("height_sampling_96x96", |b| {
        b.iter(|| {
            let mut acc = 0i64;
            for x in -48..48 {
                for z in -48..48 {
                    acc += i64::from(field.sample(black_box(x), black_box(z)).height);
                }
            }
            black_box(acc);
        })
    });
}

/// Full world build at the default map size.
fn bench_world_build(c: &mut Criterion) {
    let field = HeightField::new(&TerrainSettings::default());
    let settings = WorldSettings::default();

    c.bench_function("world_build_96", |b| {
        b.iter(|| {
            black_box(build_world(&settings, &field));
        })
    });
}

/// Smaller build, for comparing how cost scales with the map area.
fn bench_world_build_small(c: &mut Criterion) {
    let field = HeightField::new(&TerrainSettings::default());
    let settings = WorldSettings {
        map_size: 32,
        ..WorldSettings::default()
    };

    c.bench_function("world_build_32", |b| {
        b.iter(|| {
            black_box(build_world(&settings, &field));
        })
    });
}

/// The per-column hash generator on its own.
fn bench_tree_rng(c: &mut Criterion) {
    c.bench_function("tree_rng_draws", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            for i in 0..1_000i32 {
                let mut rng = ColumnRng::new(i, -i, 7);
                acc = acc.wrapping_add(rng.next_u64());
                acc = acc.wrapping_add(u64::from(rng.next_in(3, 5) as u32));
            }
            black_box(acc);
        })
    });
}

/// Many simulation steps of the full movement model: steering toward a
/// target plus terrain following, on the default field.
fn bench_agent_walk_sim(c: &mut Criterion) {
    let field = HeightField::new(&TerrainSettings::default());
    let tuning = AgentSettings::default();
    let dt = 1.0f32 / 60.0f32;

    c.bench_function("agent_walk_many_steps", |b| {
        b.iter(|| {
            let mut agent = Agent::at(Vec2::ZERO, 10.0);
            agent.target = Some(Vec2::new(40.0, -35.0));

            for _ in 0..5_000 {
                steer_toward(&mut agent, &tuning, dt);
                follow_step(&mut agent, &field, &tuning, dt);
                if agent.target.is_none() {
                    // Walk back and forth so every iteration does real work.
                    agent.target = Some(-agent.planar);
                }
            }

            black_box(agent.position());
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(60);
    targets =
        bench_height_sampling,
        bench_world_build,
        bench_world_build_small,
        bench_tree_rng,
        bench_agent_walk_sim
}
criterion_main!(benches);
