//! Static checks over an untyped configuration mapping.
//!
//! Both passes collect every problem they find instead of stopping at the
//! first one, so a single run reports everything wrong with a file.

use blueprints::{EnvError, Result, RewardType, WorldType};
use serde_json::Value;
use tracing::warn;

const REQUIRED_FIELDS: [&str; 5] = ["name", "world", "sensory", "actions", "reward"];

/// Schema and consistency checks run before any environment is built.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Checks required keys, tag values and field types.
    #[must_use]
    pub fn validate_schema(config: &Value) -> Vec<String> {
        let mut errors: Vec<String> = REQUIRED_FIELDS
            .into_iter()
            .filter(|field| config.get(field).is_none())
            .map(|field| format!("Missing required field: {field}"))
            .collect();

        match config.pointer("/world/type") {
            None => errors.push("Missing world.type".into()),
            Some(kind) if !is_tag(kind, WorldType::ALL.map(WorldType::as_str)) => {
                errors.push(format!("Unknown world type: {}", show(kind)));
            }
            Some(_) => {}
        }

        match config.pointer("/world/dimensions") {
            None => errors.push("Missing world.dimensions".into()),
            Some(Value::Array(dims)) => {
                for (i, dim) in dims.iter().enumerate() {
                    if !is_positive_int(dim) {
                        errors.push(format!(
                            "world.dimensions[{i}] must be a positive integer, got {}",
                            show(dim)
                        ));
                    }
                }
            }
            Some(_) => errors.push("world.dimensions must be a list".into()),
        }

        if config.pointer("/sensory/encoding").is_none() {
            errors.push("Missing sensory.encoding".into());
        }

        if let Some(num_actions) = config.pointer("/actions/num_actions") {
            if !is_positive_int(num_actions) {
                errors.push("actions.num_actions must be a positive integer".into());
            }
        }

        match config.pointer("/reward/type") {
            None => errors.push("Missing reward.type".into()),
            Some(kind) if !is_tag(kind, RewardType::ALL.map(RewardType::as_str)) => {
                errors.push(format!("Unknown reward type: {}", show(kind)));
            }
            Some(_) => {}
        }

        errors
    }

    /// Checks that related fields agree with each other.
    #[must_use]
    pub fn validate_consistency(config: &Value) -> Vec<String> {
        let mut errors = Vec::new();

        let dims = config
            .pointer("/world/dimensions")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        match config.pointer("/sensory/output_shape") {
            None | Some(Value::Null) => {}
            Some(Value::Array(shape)) => {
                if !shape.is_empty() && shape.len() != dims {
                    errors.push(format!(
                        "sensory.output_shape dimensions ({}) must match world.dimensions ({dims})",
                        shape.len()
                    ));
                }
            }
            Some(_) => errors.push("sensory.output_shape must be a list".into()),
        }

        let min_reward = reward_bound(config, "min_reward", -1.0, &mut errors);
        let max_reward = reward_bound(config, "max_reward", 1.0, &mut errors);
        if let (Some(min), Some(max)) = (min_reward, max_reward) {
            if min.is_nan() || max.is_nan() || min >= max {
                errors.push(format!(
                    "reward.min_reward ({min:?}) must be < reward.max_reward ({max:?})"
                ));
            }
        }

        errors
    }

    /// Runs both passes and folds their messages into one error.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ValidationAggregate`] listing every problem found.
    pub fn validate_all(config: &Value) -> Result<bool> {
        let mut errors = Self::validate_schema(config);
        errors.extend(Self::validate_consistency(config));

        if errors.is_empty() {
            return Ok(true);
        }
        warn!(count = errors.len(), "configuration validation failed");
        Err(EnvError::ValidationAggregate {
            summary: "Configuration validation failed".into(),
            errors,
        })
    }
}

fn is_tag<const N: usize>(value: &Value, tags: [&str; N]) -> bool {
    value.as_str().is_some_and(|tag| tags.contains(&tag))
}

fn is_positive_int(value: &Value) -> bool {
    value.as_u64().is_some_and(|v| v > 0)
}

fn show(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_string)
}

fn reward_bound(config: &Value, key: &str, default: f64, errors: &mut Vec<String>) -> Option<f64> {
    match config.get("reward").and_then(|reward| reward.get(key)) {
        None => Some(default),
        Some(value) => {
            let bound = value.as_f64();
            if bound.is_none() {
                errors.push(format!("reward.{key} must be a number, got {}", show(value)));
            }
            bound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_grid() -> Value {
        json!({
            "name": "minimal",
            "world": {"type": "grid", "dimensions": [10, 10]},
            "sensory": {"encoding": "one_hot"},
            "actions": {"num_actions": 4},
            "reward": {"type": "discrete", "min_reward": -1, "max_reward": 1},
        })
    }

    #[test]
    fn minimal_grid_is_clean() {
        assert!(ConfigValidator::validate_schema(&minimal_grid()).is_empty());
        assert!(ConfigValidator::validate_consistency(&minimal_grid()).is_empty());
        assert!(ConfigValidator::validate_all(&minimal_grid()).unwrap());
    }

    #[test]
    fn missing_reward_is_reported() {
        let mut config = minimal_grid();
        config.as_object_mut().unwrap().remove("reward");
        let errors = ConfigValidator::validate_schema(&config);
        assert!(errors.contains(&"Missing required field: reward".to_string()));
        assert!(errors.contains(&"Missing reward.type".to_string()));
    }

    #[test]
    fn each_bad_dimension_is_named() {
        let mut config = minimal_grid();
        config["world"]["dimensions"] = json!([10, 0, "wide", -3]);
        let errors = ConfigValidator::validate_schema(&config);
        assert_eq!(
            errors,
            [
                "world.dimensions[1] must be a positive integer, got 0",
                "world.dimensions[2] must be a positive integer, got wide",
                "world.dimensions[3] must be a positive integer, got -3",
            ]
        );
    }

    #[test]
    fn unknown_tags_are_reported() {
        let mut config = minimal_grid();
        config["world"]["type"] = json!("hexagonal");
        config["reward"]["type"] = json!("dense");
        let errors = ConfigValidator::validate_schema(&config);
        assert!(errors.contains(&"Unknown world type: hexagonal".to_string()));
        assert!(errors.contains(&"Unknown reward type: dense".to_string()));
    }

    #[test]
    fn equal_reward_bounds_are_inconsistent() {
        let mut config = minimal_grid();
        config["reward"]["min_reward"] = json!(1.0);
        config["reward"]["max_reward"] = json!(1.0);
        assert_eq!(
            ConfigValidator::validate_consistency(&config),
            ["reward.min_reward (1.0) must be < reward.max_reward (1.0)"]
        );
    }

    #[test]
    fn output_shape_rank_must_match() {
        let mut config = minimal_grid();
        config["sensory"]["output_shape"] = json!([10, 10, 3]);
        let errors = ConfigValidator::validate_consistency(&config);
        assert_eq!(
            errors,
            ["sensory.output_shape dimensions (3) must match world.dimensions (2)"]
        );
    }

    #[test]
    fn validate_all_combines_both_passes() {
        let mut config = minimal_grid();
        config["sensory"] = json!({});
        config["reward"]["max_reward"] = json!(-2);
        let err = ConfigValidator::validate_all(&config).unwrap_err();
        let EnvError::ValidationAggregate { summary, errors } = &err else {
            panic!("expected an aggregate, got {err:?}");
        };
        assert_eq!(summary, "Configuration validation failed");
        assert_eq!(errors.len(), 2);
        assert!(err.to_string().starts_with("Configuration validation failed:\n  - "));
    }
}
