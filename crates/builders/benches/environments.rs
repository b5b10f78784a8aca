use blueprints::StaticEnvironment;
use builders::{build_environment, Environment};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

fn grid() -> Environment {
    build_environment(&json!({
        "name": "bench_grid",
        "world": {"type": "grid", "dimensions": [64, 64]},
        "sensory": {"encoding": "one_hot"},
        "actions": {"num_actions": 4},
        "reward": {"type": "discrete"},
    }))
    .unwrap()
}

fn field() -> Environment {
    build_environment(&json!({
        "name": "bench_field",
        "world": {"type": "continuous_field", "dimensions": [32, 32], "feature_channels": 4},
        "sensory": {"encoding": "gaussian"},
        "actions": {"num_actions": 8},
        "reward": {"type": "continuous", "min_reward": 0.0, "max_reward": 1.0},
    }))
    .unwrap()
}

fn bench_sensory(c: &mut Criterion) {
    let grid = grid();
    c.bench_function("grid_sensory_64x64", |b| b.iter(|| grid.get_sensory_input().unwrap()));
    let field = field();
    c.bench_function("field_sensory_32x32x4", |b| b.iter(|| field.get_sensory_input().unwrap()));
}

fn bench_step(c: &mut Criterion) {
    for (name, mut env) in [("grid_step", grid()), ("field_step", field())] {
        let actions = env.metadata().num_actions as i64;
        c.bench_function(name, |b| {
            let mut action = 0;
            b.iter(|| {
                action = (action + 1) % actions;
                env.step(black_box(action)).unwrap()
            });
        });
    }
}

criterion_group!(benches, bench_sensory, bench_step);
criterion_main!(benches);
