//! Continuous 2-D field with eight-way movement and a distance-shaped reward.

use std::fmt;
use std::sync::Arc;

use blueprints::{
    EnvError, EnvironmentMetadata, Encoder, RawState, Result, RewardStructure, SensoryField,
    StaticEnvironment,
};
use ndarray::{ArrayD, IxDyn};
use serde::Serialize;

/// Width of the Gaussian bump centred on the agent.
pub const SENSORY_SIGMA: f64 = 2.0;

/// Unit and diagonal movement vectors for actions `0..8`, as `(d_row, d_col)`.
pub const COMPASS_MOVES: [(f64, f64); 8] = [
    (1.0, 0.0),   // north
    (1.0, 1.0),   // north-east
    (0.0, 1.0),   // east
    (-1.0, 1.0),  // south-east
    (-1.0, 0.0),  // south
    (-1.0, -1.0), // south-west
    (0.0, -1.0),  // west
    (1.0, -1.0),  // north-west
];

pub const COMPASS_NAMES: [&str; 8] = [
    "north",
    "northeast",
    "east",
    "southeast",
    "south",
    "southwest",
    "west",
    "northwest",
];

/// Runtime state of a [`ContinuousEnvironment`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContinuousState {
    pub agent_position: [f64; 2],
    pub goal_position: [f64; 2],
    pub field_width: usize,
    pub field_height: usize,
}

/// Continuous field sensed as a Gaussian bump around the agent.
///
/// Every cell `(i, j)` observes `exp(-d² / 2σ²)` where `d` is its distance to
/// the agent, repeated across all feature channels. The reward after each
/// move is `1 - distance_to_goal / diagonal`.
#[derive(Debug, Clone)]
pub struct ContinuousEnvironment {
    /// Shared by clones, which validators take once per action.
    metadata: Arc<EnvironmentMetadata>,
    reward_structure: RewardStructure,
    field: SensoryField,
    feature_channels: usize,
    /// Extent along the first two axes; a 1-D world has height 1.
    extent: (usize, usize),
    goal_position: [f64; 2],
    agent_position: [f64; 2],
    initialized: bool,
}

impl ContinuousEnvironment {
    /// # Errors
    ///
    /// Fails when the world has no dimensions, when the output shape is not
    /// `dimensions + [feature_channels]`, or when the goal lies outside the field.
    pub fn new(
        metadata: EnvironmentMetadata,
        reward_structure: RewardStructure,
        field: SensoryField,
        feature_channels: usize,
        goal_position: Option<[f64; 2]>,
    ) -> Result<Self> {
        let Some(&width) = metadata.dimensions.first() else {
            return Err(EnvError::ConfigSchema(
                "Continuous world must have at least 1 dimension".into(),
            ));
        };
        let height = metadata.dimensions.get(1).copied().unwrap_or(1);
        if width == 0 || height == 0 || feature_channels == 0 {
            return Err(EnvError::ConfigSchema(
                "dimensions and feature_channels must be positive integers".into(),
            ));
        }

        let mut expected_shape = metadata.dimensions.clone();
        expected_shape.push(feature_channels);
        if metadata.sensory_output_shape != expected_shape {
            return Err(EnvError::ConfigConsistency(format!(
                "continuous sensory.output_shape {:?} must equal world.dimensions plus \
                 feature channels {expected_shape:?}",
                metadata.sensory_output_shape
            )));
        }

        let far_corner = [(width - 1) as f64, (height - 1) as f64];
        let goal_position = goal_position.unwrap_or(far_corner);
        let inside = goal_position
            .iter()
            .zip(far_corner)
            .all(|(&coord, max)| (0.0..=max).contains(&coord));
        if !inside {
            return Err(EnvError::ConfigConsistency(format!(
                "goal position {goal_position:?} lies outside a {width}x{height} field"
            )));
        }

        Ok(Self {
            metadata: Arc::new(metadata),
            reward_structure,
            field,
            feature_channels,
            extent: (width, height),
            goal_position,
            agent_position: [0.0, 0.0],
            initialized: false,
        })
    }

    #[must_use]
    pub fn agent_position(&self) -> [f64; 2] {
        self.agent_position
    }

    #[must_use]
    pub fn goal_position(&self) -> [f64; 2] {
        self.goal_position
    }

    #[must_use]
    pub fn feature_channels(&self) -> usize {
        self.feature_channels
    }

    #[must_use]
    pub fn reward_structure(&self) -> &RewardStructure {
        &self.reward_structure
    }

    fn max_distance(&self) -> f64 {
        let (width, height) = self.extent;
        (width as f64).hypot(height as f64)
    }

    fn distance_to_goal(&self) -> f64 {
        let [x, y] = self.agent_position;
        let [gx, gy] = self.goal_position;
        (x - gx).hypot(y - gy)
    }
}

impl StaticEnvironment for ContinuousEnvironment {
    type State = ContinuousState;

    fn metadata(&self) -> &EnvironmentMetadata {
        &self.metadata
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn initialize(&mut self) -> Result<()> {
        self.agent_position = [0.0, 0.0];
        self.initialized = true;
        Ok(())
    }

    fn get_sensory_input(&self) -> Result<ArrayD<f32>> {
        self.ensure_initialized()?;
        let [x, y] = self.agent_position;
        let planar = self.metadata.dimensions.len() >= 2;
        let two_sigma_sq = 2.0 * SENSORY_SIGMA * SENSORY_SIGMA;

        let raw = ArrayD::from_shape_fn(IxDyn(&self.metadata.sensory_output_shape), |ix| {
            let i = ix[0] as f64;
            let j = if planar { ix[1] as f64 } else { 0.0 };
            let dist_sq = (i - x).powi(2) + (j - y).powi(2);
            (-dist_sq / two_sigma_sq).exp() as f32
        });
        self.field.encode(RawState::Array(raw))
    }

    fn compute_reward(&mut self, action: i64) -> Result<f64> {
        self.ensure_initialized()?;
        let index = self.metadata.action_index(action)?;
        if let Some(&(d_row, d_col)) = COMPASS_MOVES.get(index) {
            let (width, height) = self.extent;
            let [x, y] = self.agent_position;
            self.agent_position = [
                (x + d_row).clamp(0.0, (width - 1) as f64),
                (y + d_col).clamp(0.0, (height - 1) as f64),
            ];
        }
        Ok(1.0 - self.distance_to_goal() / self.max_distance())
    }

    fn state_snapshot(&self) -> ContinuousState {
        ContinuousState {
            agent_position: self.agent_position,
            goal_position: self.goal_position,
            field_width: self.extent.0,
            field_height: self.extent.1,
        }
    }
}

impl fmt::Display for ContinuousEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ContinuousEnvironment(name={}, type={}, dims={:?}, channels={})",
            self.metadata.name,
            self.metadata.environment_type,
            self.metadata.dimensions,
            self.feature_channels
        )
    }
}
