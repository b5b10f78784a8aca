//! Determinism and reward-magnitude checks.

use blueprints::{EnvError, Result, StaticEnvironment};
use ndarray::ArrayD;
use tracing::warn;

/// Sanity envelope every reward must stay inside.
pub const REWARD_SANITY_BOUND: f64 = 1e6;

/// Relative tolerance used when comparing two observations.
pub const RTOL: f32 = 1e-5;
/// Absolute tolerance used when comparing two observations.
pub const ATOL: f32 = 1e-8;

/// Checks that an environment behaves the same every time it is reset.
pub struct ConsistencyChecker;

struct Sample {
    before: ArrayD<f32>,
    reward: f64,
    after: ArrayD<f32>,
}

impl ConsistencyChecker {
    /// Replays each of the first `min(num_samples, num_actions)` actions
    /// twice from a fresh reset and requires matching observations and
    /// identical rewards. Leaves `env` freshly reset.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NonDeterminism`] at the first divergence, or any
    /// error the environment raises while being driven.
    #[allow(clippy::float_cmp)]
    pub fn check_determinism<E: StaticEnvironment>(
        env: &mut E,
        num_samples: usize,
    ) -> Result<bool> {
        let actions: Vec<i64> = env.metadata().actions().take(num_samples).collect();

        for action in actions {
            let first = sample(env, action)?;
            let second = sample(env, action)?;

            if !allclose(&first.before, &second.before) || !allclose(&first.after, &second.after) {
                warn!(action, "sensory output diverged between resets");
                return Err(EnvError::NonDeterminism(format!(
                    "Sensory output not deterministic for action {action}"
                )));
            }
            if first.reward != second.reward {
                warn!(action, "reward diverged between resets");
                return Err(EnvError::NonDeterminism(format!(
                    "Reward not deterministic for action {action}: {} vs {}",
                    first.reward, second.reward
                )));
            }
        }

        env.reset()?;
        Ok(true)
    }

    /// Requires every action's reward to lie within
    /// `±`[`REWARD_SANITY_BOUND`]. Rewards are computed on clones of `env`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::RewardOutOfBounds`] for the first offending
    /// action, or any error raised while computing a reward.
    pub fn check_bounds<E: StaticEnvironment + Clone>(env: &E) -> Result<bool> {
        for action in env.metadata().actions() {
            let reward = env.clone().compute_reward(action)?;
            if !(-REWARD_SANITY_BOUND..=REWARD_SANITY_BOUND).contains(&reward) {
                warn!(action, reward, "reward outside sanity envelope");
                return Err(EnvError::RewardOutOfBounds { action, reward });
            }
        }
        Ok(true)
    }
}

fn sample<E: StaticEnvironment>(env: &mut E, action: i64) -> Result<Sample> {
    let before = env.reset()?;
    let reward = env.compute_reward(action)?;
    let after = env.get_sensory_input()?;
    Ok(Sample { before, reward, after })
}

/// Element-wise `|a - b| <= ATOL + RTOL * |b|`; NaN never compares close.
#[must_use]
pub fn allclose(a: &ArrayD<f32>, b: &ArrayD<f32>) -> bool {
    a.shape() == b.shape()
        && a.iter()
            .zip(b.iter())
            .all(|(&x, &y)| (x - y).abs() <= ATOL + RTOL * y.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn allclose_tolerates_rounding_only() {
        let a = ArrayD::from_elem(IxDyn(&[2, 2]), 0.5_f32);
        let mut b = a.clone();
        b[[1, 1]] += 1e-7;
        assert!(allclose(&a, &b));
        b[[1, 1]] += 1e-3;
        assert!(!allclose(&a, &b));
    }

    #[test]
    fn allclose_rejects_shape_and_nan() {
        let a = ArrayD::<f32>::zeros(IxDyn(&[2, 2]));
        assert!(!allclose(&a, &ArrayD::zeros(IxDyn(&[4]))));
        let nan = ArrayD::from_elem(IxDyn(&[2, 2]), f32::NAN);
        assert!(!allclose(&nan, &nan));
    }
}
