//! Runner logic behind the `statica` binary.
//!
//! [`run`] builds an environment from a configuration file, optionally puts
//! it through every dynamic check, then drives it for a fixed number of steps
//! and logs each reward together with the JSON state snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use blueprints::StaticEnvironment;
use builders::build_environment_from_config;
use validation::{ConsistencyChecker, EnvironmentValidator};

/// What the runner should do.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: PathBuf,
    pub steps: usize,
    /// Actions to cycle through; every action in order when empty.
    pub actions: Vec<i64>,
    pub validate: bool,
    /// Actions replayed by the determinism check.
    pub samples: usize,
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub total_reward: f64,
}

/// Builds the configured environment and steps it.
///
/// # Errors
///
/// Returns any construction, validation or stepping error, with the config
/// path attached.
pub fn run(options: &RunOptions) -> Result<RunSummary> {
    let mut env = build_environment_from_config(&options.config)
        .with_context(|| format!("building environment from {}", options.config.display()))?;
    tracing::info!("Built {env}");

    if options.validate {
        env.validate()?;
        EnvironmentValidator::validate_all(&env)?;
        ConsistencyChecker::check_bounds(&env)?;
        ConsistencyChecker::check_determinism(&mut env, options.samples)?;
        tracing::info!("All dynamic checks passed.");
    }

    let actions = if options.actions.is_empty() {
        env.metadata().actions().collect()
    } else {
        options.actions.clone()
    };

    env.reset()?;
    let mut total_reward = 0.0;
    for (i, &action) in actions.iter().cycle().take(options.steps).enumerate() {
        let (_, reward, info) = env
            .step(action)
            .with_context(|| format!("step {} with action {action}", i + 1))?;
        total_reward += reward;
        tracing::info!(
            "Step {} action={} reward={:.4} state={}",
            i + 1,
            action,
            reward,
            serde_json::to_string(&info.state_snapshot)?
        );
    }

    tracing::info!("Finished {} steps, total reward {:.4}.", options.steps, total_reward);
    Ok(RunSummary {
        steps: options.steps,
        total_reward,
    })
}
