use std::fs;

use blueprints::EnvError;
use serde_json::Value;
use validation::ConfigValidator;

fn load(name: &str) -> Value {
    let text = fs::read_to_string(format!("tests/data/{name}")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn minimal_grid_passes_both_passes() {
    let config = load("minimal_grid.json");
    assert!(ConfigValidator::validate_schema(&config).is_empty());
    assert!(ConfigValidator::validate_consistency(&config).is_empty());
    assert!(ConfigValidator::validate_all(&config).unwrap());
}

#[test]
fn broken_config_reports_every_problem() {
    let config = load("broken.json");

    let schema = ConfigValidator::validate_schema(&config);
    assert_eq!(
        schema,
        [
            "Unknown world type: torus",
            "world.dimensions[1] must be a positive integer, got 0",
            "Missing sensory.encoding",
            "actions.num_actions must be a positive integer",
        ]
    );

    let consistency = ConfigValidator::validate_consistency(&config);
    assert_eq!(
        consistency,
        [
            "sensory.output_shape dimensions (1) must match world.dimensions (2)",
            "reward.min_reward (2.0) must be < reward.max_reward (1.0)",
        ]
    );

    match ConfigValidator::validate_all(&config) {
        Err(EnvError::ValidationAggregate { errors, .. }) => assert_eq!(errors.len(), 6),
        other => panic!("expected an aggregate error, got {other:?}"),
    }
}

#[test]
fn empty_mapping_lists_every_required_field() {
    let errors = ConfigValidator::validate_schema(&Value::Object(Default::default()));
    for field in ["name", "world", "sensory", "actions", "reward"] {
        assert!(errors.contains(&format!("Missing required field: {field}")));
    }
    assert!(errors.contains(&"Missing world.type".to_string()));
    assert!(errors.contains(&"Missing world.dimensions".to_string()));
}

#[test]
fn num_actions_is_optional() {
    let mut config = load("minimal_grid.json");
    config["actions"] = serde_json::json!({});
    assert!(ConfigValidator::validate_schema(&config).is_empty());
}
