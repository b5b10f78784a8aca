//! # Environment Contract
//!
//! Every static environment implements [`StaticEnvironment`]. Implementors
//! provide the three world-specific operations ([`initialize`],
//! [`get_sensory_input`] and [`compute_reward`]) together with a few
//! accessors; the lifecycle operations ([`reset`], [`step`], [`get_state`]
//! and [`validate`]) are built once here on top of them.
//!
//! An environment starts *uninitialized*. `initialize()` moves it to the
//! *initialized* state, and every sensory or reward query before that fails
//! with [`EnvError::RuntimeState`].
//!
//! [`initialize`]: StaticEnvironment::initialize
//! [`get_sensory_input`]: StaticEnvironment::get_sensory_input
//! [`compute_reward`]: StaticEnvironment::compute_reward
//! [`reset`]: StaticEnvironment::reset
//! [`step`]: StaticEnvironment::step
//! [`get_state`]: StaticEnvironment::get_state
//! [`validate`]: StaticEnvironment::validate

use std::collections::BTreeMap;

use ndarray::ArrayD;
use serde::Serialize;

use crate::error::{EnvError, Result};
use crate::world::{WorldState, WorldType};

/// Descriptive, immutable facts about an environment instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentMetadata {
    pub name: String,
    pub environment_type: WorldType,
    pub dimensions: Vec<usize>,
    pub sensory_output_shape: Vec<usize>,
    pub num_actions: usize,
    pub num_reward_values: Option<usize>,
    pub description: Option<String>,
    pub action_descriptions: BTreeMap<usize, String>,
}

impl EnvironmentMetadata {
    /// Checks `action` against `[0, num_actions)` and returns it as an index.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ActionRange`] for negative or too-large actions.
    pub fn action_index(&self, action: i64) -> Result<usize> {
        usize::try_from(action)
            .ok()
            .filter(|&index| index < self.num_actions)
            .ok_or(EnvError::ActionRange {
                action,
                num_actions: self.num_actions,
            })
    }

    /// All valid actions, in order.
    pub fn actions(&self) -> impl Iterator<Item = i64> {
        (0..self.num_actions).map(|index| index as i64)
    }
}

impl From<&WorldState> for EnvironmentMetadata {
    fn from(world: &WorldState) -> Self {
        Self {
            name: world.name().to_string(),
            environment_type: world.world_type(),
            dimensions: world.dimensions().to_vec(),
            sensory_output_shape: world.sensory_output_shape().to_vec(),
            num_actions: world.num_actions(),
            num_reward_values: world
                .reward_structure()
                .and_then(|reward| reward.values.as_ref())
                .map(Vec::len),
            description: world
                .get_metadata("description")
                .and_then(|value| value.as_str())
                .map(str::to_string),
            action_descriptions: world.action_descriptions().clone(),
        }
    }
}

/// Extra information returned alongside every [`StaticEnvironment::step`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepInfo<S> {
    pub action: i64,
    pub reward: f64,
    pub state_snapshot: S,
}

/// `(sensory_input, reward, info)` as returned by [`StaticEnvironment::step`].
pub type StepResult<S> = (ArrayD<f32>, f64, StepInfo<S>);

/// The capability set every static environment provides.
pub trait StaticEnvironment {
    /// Typed snapshot of the mutable runtime state.
    type State: Clone;

    fn metadata(&self) -> &EnvironmentMetadata;

    fn is_initialized(&self) -> bool;

    /// Sets up (or restores) the initial runtime state.
    ///
    /// # Errors
    ///
    /// Implementations fail if the environment cannot reach a valid initial
    /// state.
    fn initialize(&mut self) -> Result<()>;

    /// Current observation, shaped like `metadata().sensory_output_shape`.
    ///
    /// # Errors
    ///
    /// Fails with [`EnvError::RuntimeState`] before `initialize()`.
    fn get_sensory_input(&self) -> Result<ArrayD<f32>>;

    /// Applies `action` and returns the deterministic reward it earns.
    ///
    /// # Errors
    ///
    /// Fails with [`EnvError::RuntimeState`] before `initialize()` and with
    /// [`EnvError::ActionRange`] for actions outside `[0, num_actions)`.
    fn compute_reward(&mut self, action: i64) -> Result<f64>;

    /// Snapshot of the live runtime state. Callers go through [`get_state`].
    ///
    /// [`get_state`]: StaticEnvironment::get_state
    fn state_snapshot(&self) -> Self::State;

    /// # Errors
    ///
    /// Returns [`EnvError::RuntimeState`] while uninitialized.
    fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(EnvError::RuntimeState(
                "Environment not initialized. Call initialize() first.".into(),
            ))
        }
    }

    /// Re-initializes and returns the fresh observation.
    ///
    /// # Errors
    ///
    /// Propagates failures from `initialize()` and `get_sensory_input()`.
    fn reset(&mut self) -> Result<ArrayD<f32>> {
        self.initialize()?;
        self.get_sensory_input()
    }

    /// Computes the reward for `action` first, then reads the observation,
    /// so the returned observation reflects the state after the action.
    ///
    /// # Errors
    ///
    /// Fails while uninitialized or for an out-of-range action.
    fn step(&mut self, action: i64) -> Result<StepResult<Self::State>> {
        self.ensure_initialized()?;
        let reward = self.compute_reward(action)?;
        let sensory = self.get_sensory_input()?;
        let info = StepInfo {
            action,
            reward,
            state_snapshot: self.state_snapshot(),
        };
        Ok((sensory, reward, info))
    }

    /// Owned copy of the runtime state.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::RuntimeState`] while uninitialized.
    fn get_state(&self) -> Result<Self::State> {
        self.ensure_initialized()?;
        Ok(self.state_snapshot())
    }

    /// Checks the observation shape against the metadata and that every
    /// action yields a finite reward.
    ///
    /// Rewards are computed on clones, so the environment itself is left
    /// exactly as it was. Each action costs one clone, so implementors keep
    /// large immutable parts such as their metadata behind an `Arc`.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: [`EnvError::RuntimeState`],
    /// [`EnvError::ShapeMismatch`], [`EnvError::NumericIntegrity`], or any
    /// error raised while computing a reward.
    fn validate(&self) -> Result<bool>
    where
        Self: Sized + Clone,
    {
        self.ensure_initialized()?;

        let sensory = self.get_sensory_input()?;
        let expected = &self.metadata().sensory_output_shape;
        if sensory.shape() != expected.as_slice() {
            return Err(EnvError::ShapeMismatch {
                what: "sensory output",
                expected: expected.clone(),
                actual: sensory.shape().to_vec(),
            });
        }

        for action in self.metadata().actions() {
            let reward = self.clone().compute_reward(action)?;
            if !reward.is_finite() {
                return Err(EnvError::NumericIntegrity(format!(
                    "Reward for action {action} is not a finite number: {reward}"
                )));
            }
        }

        Ok(true)
    }
}
