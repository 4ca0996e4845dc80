use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use nightblade_core::actor::PlayerInput;
use nightblade_core::{DamageResolver, DamageStats, GameConfig, Simulation};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_damage_resolve(c: &mut Criterion) {
    let stats = DamageStats::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("damage_resolve", |b| {
        b.iter(|| DamageResolver::resolve(black_box(&stats), None, black_box(Vec2::X), &mut rng))
    });
}

fn bench_simulation_frame(c: &mut Criterion) {
    let mut sim = Simulation::new(GameConfig::default()).expect("default config is valid");
    // Spread enemies out so some patrol and some chase
    for i in 0..8 {
        let x = (i as f32 - 3.5) * 3.0;
        sim.spawn_enemy("skeleton", Vec2::new(x, 0.0))
            .expect("skeleton archetype exists");
    }
    let input = PlayerInput {
        move_x: 0.5,
        ..PlayerInput::default()
    };

    c.bench_function("simulation_frame", |b| {
        b.iter(|| {
            sim.advance(black_box(1.0 / 60.0), input);
            black_box(sim.take_events())
        })
    });
}

criterion_group!(benches, bench_damage_resolve, bench_simulation_frame);
criterion_main!(benches);
