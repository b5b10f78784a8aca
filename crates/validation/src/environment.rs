//! Post-construction checks on a live environment.

use blueprints::{EnvError, Result, StaticEnvironment};
use tracing::warn;

/// Sensory and reward checks that collect every failure into one report.
pub struct EnvironmentValidator;

impl EnvironmentValidator {
    /// Checks the current observation's shape and that it holds only finite
    /// values.
    #[must_use]
    pub fn validate_sensory_output<E: StaticEnvironment>(env: &E) -> Vec<String> {
        let sensory = match env.get_sensory_input() {
            Ok(sensory) => sensory,
            Err(err) => return vec![format!("Failed to get sensory input: {err}")],
        };

        let mut errors = Vec::new();
        let expected = &env.metadata().sensory_output_shape;
        if sensory.shape() != expected.as_slice() {
            errors.push(format!(
                "Sensory shape mismatch: expected {expected:?}, got {:?}",
                sensory.shape()
            ));
        }
        if sensory.iter().any(|v| v.is_nan()) {
            errors.push("Sensory output contains NaN values".into());
        }
        if sensory.iter().any(|v| v.is_infinite()) {
            errors.push("Sensory output contains infinite values".into());
        }
        errors
    }

    /// Tries every action on a clone of `env` and reports each failing or
    /// non-finite reward separately.
    #[must_use]
    pub fn validate_rewards<E: StaticEnvironment + Clone>(env: &E) -> Vec<String> {
        env.metadata()
            .actions()
            .filter_map(|action| match env.clone().compute_reward(action) {
                Err(err) => Some(format!("Failed to compute reward for action {action}: {err}")),
                Ok(reward) if reward.is_nan() => Some(format!("Reward is NaN for action {action}")),
                Ok(reward) if reward.is_infinite() => {
                    Some(format!("Reward is infinite for action {action}"))
                }
                Ok(_) => None,
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns [`EnvError::ValidationAggregate`] naming the environment and
    /// listing every sensory and reward problem.
    pub fn validate_all<E: StaticEnvironment + Clone>(env: &E) -> Result<bool> {
        let mut errors = Self::validate_sensory_output(env);
        errors.extend(Self::validate_rewards(env));

        if errors.is_empty() {
            return Ok(true);
        }
        let name = &env.metadata().name;
        warn!(environment = %name, count = errors.len(), "environment validation failed");
        Err(EnvError::ValidationAggregate {
            summary: format!("Environment validation failed for {name}"),
            errors,
        })
    }
}
