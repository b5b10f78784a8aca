use blueprints::{EnvError, StaticEnvironment};
use builders::{
    build_environment, build_environment_from_config, load_config, GridEnvironmentBuilder,
};
use serde_json::json;

#[test]
fn every_fixture_renders_its_declared_shape() {
    for path in [
        "tests/data/basic_grid.yaml",
        "tests/data/small_grid.json",
        "tests/data/continuous_field.json",
    ] {
        let env = build_environment_from_config(path).unwrap();
        let sensory = env.get_sensory_input().unwrap();
        assert_eq!(sensory.shape(), env.metadata().sensory_output_shape.as_slice(), "{path}");
    }
}

#[test]
fn abstract_worlds_have_no_builder() {
    let err = build_environment_from_config("tests/data/abstract_world.yaml").unwrap_err();
    assert!(matches!(err, EnvError::Construction(_)));
}

#[test]
fn unknown_world_type_fails_before_construction() {
    let config = json!({
        "name": "hex",
        "world": {"type": "hexagonal", "dimensions": [4, 4]},
        "sensory": {"encoding": "one_hot"},
        "actions": {"num_actions": 6},
        "reward": {"type": "sparse"},
    });
    let err = build_environment(&config).unwrap_err();
    assert!(matches!(err, EnvError::ValidationAggregate { .. }));
    assert!(err.to_string().contains("Unknown world type: hexagonal"));
}

#[test]
fn inverted_reward_bounds_are_reported() {
    let err = build_environment_from_config("tests/data/inverted_rewards.yaml").unwrap_err();
    assert!(err
        .to_string()
        .contains("reward.min_reward (1.0) must be < reward.max_reward (-1.0)"));
}

#[test]
fn missing_file_names_the_path() {
    let err = load_config("tests/data/nowhere.yaml").unwrap_err();
    assert!(matches!(err, EnvError::ConfigRead { .. }));
    assert!(err.to_string().contains("nowhere.yaml"));
}

#[test]
fn sequence_root_is_not_a_mapping() {
    let err = load_config("tests/data/not_a_mapping.yaml").unwrap_err();
    match err {
        EnvError::ConfigParse { reason, .. } => assert_eq!(reason, "Config must be a mapping"),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn yaml_and_json_load_to_the_same_shape() {
    let yaml = load_config("tests/data/basic_grid.yaml").unwrap();
    assert_eq!(yaml["world"]["dimensions"], json!([10, 10]));
    let json = load_config("tests/data/small_grid.json").unwrap();
    assert_eq!(json["world"]["goal_position"], json!([0, 0]));
}

#[test]
fn grid_builder_rejects_flat_worlds() {
    let config = json!({
        "name": "line",
        "world": {"type": "grid", "dimensions": [10]},
        "sensory": {"encoding": "one_hot"},
        "actions": {"num_actions": 4},
        "reward": {"type": "discrete"},
    });
    assert!(matches!(GridEnvironmentBuilder::new(&config), Err(EnvError::ConfigSchema(_))));
    assert!(matches!(build_environment(&config), Err(EnvError::ConfigSchema(_))));
}

#[test]
fn grid_goal_outside_is_inconsistent() {
    let config = json!({
        "name": "far",
        "world": {"type": "grid", "dimensions": [3, 3], "goal_position": [3, 0]},
        "sensory": {"encoding": "one_hot"},
        "actions": {"num_actions": 4},
        "reward": {"type": "discrete"},
    });
    assert!(matches!(build_environment(&config), Err(EnvError::ConfigConsistency(_))));
}
