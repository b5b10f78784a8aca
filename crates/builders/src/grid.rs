//! Discrete 2-D grid world with four-way movement toward a fixed goal cell.

use std::fmt;
use std::sync::Arc;

use blueprints::{
    EnvError, EnvironmentMetadata, Encoder, RawState, Result, RewardStructure, SensoryField,
    StaticEnvironment,
};
use ndarray::{ArrayD, Axis, IxDyn};
use serde::Serialize;

pub const GOAL_REWARD: f64 = 1.0;
pub const STEP_COST: f64 = -0.01;

const AGENT_MARKER: f32 = 1.0;
const GOAL_MARKER: f32 = 0.5;

/// A `(row, col)` grid cell.
pub type Cell = (usize, usize);

/// Movement for actions `0..4`. Higher actions leave the agent in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMove {
    Up,
    Down,
    Left,
    Right,
}

impl GridMove {
    pub const ALL: [GridMove; 4] = [GridMove::Up, GridMove::Down, GridMove::Left, GridMove::Right];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GridMove::Up => "up",
            GridMove::Down => "down",
            GridMove::Left => "left",
            GridMove::Right => "right",
        }
    }

    fn apply(self, (row, col): Cell, (rows, cols): (usize, usize)) -> Cell {
        match self {
            GridMove::Up => (row.saturating_sub(1), col),
            GridMove::Down => ((row + 1).min(rows - 1), col),
            GridMove::Left => (row, col.saturating_sub(1)),
            GridMove::Right => (row, (col + 1).min(cols - 1)),
        }
    }
}

/// Runtime state of a [`GridEnvironment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridState {
    pub agent_position: Cell,
    pub goal_position: Cell,
    pub rows: usize,
    pub cols: usize,
}

/// Grid world where the agent starts at `(0, 0)` and walks toward a goal.
///
/// The observation is a zero field with `1.0` at the agent cell and `0.5` at
/// the goal cell. The goal is written second, so when both share a cell it
/// reads `0.5`.
#[derive(Debug, Clone)]
pub struct GridEnvironment {
    /// Shared by clones, which validators take once per action.
    metadata: Arc<EnvironmentMetadata>,
    reward_structure: RewardStructure,
    field: SensoryField,
    extent: (usize, usize),
    goal_position: Cell,
    agent_position: Cell,
    initialized: bool,
}

impl GridEnvironment {
    /// # Errors
    ///
    /// Fails when the world has fewer than two dimensions, when the output
    /// shape differs from the dimensions, or when the goal lies outside the grid.
    pub fn new(
        metadata: EnvironmentMetadata,
        reward_structure: RewardStructure,
        field: SensoryField,
        goal_position: Option<Cell>,
    ) -> Result<Self> {
        let &[rows, cols, ..] = metadata.dimensions.as_slice() else {
            return Err(EnvError::ConfigSchema(
                "Grid world must have at least 2 dimensions".into(),
            ));
        };
        if rows == 0 || cols == 0 {
            return Err(EnvError::ConfigSchema(
                "All dimensions must be positive integers".into(),
            ));
        }
        if metadata.sensory_output_shape != metadata.dimensions {
            return Err(EnvError::ConfigConsistency(format!(
                "grid sensory.output_shape {:?} must equal world.dimensions {:?}",
                metadata.sensory_output_shape, metadata.dimensions
            )));
        }
        let goal_position = goal_position.unwrap_or((rows - 1, cols - 1));
        if goal_position.0 >= rows || goal_position.1 >= cols {
            return Err(EnvError::ConfigConsistency(format!(
                "goal position {goal_position:?} lies outside a {rows}x{cols} grid"
            )));
        }
        Ok(Self {
            metadata: Arc::new(metadata),
            reward_structure,
            field,
            extent: (rows, cols),
            goal_position,
            agent_position: (0, 0),
            initialized: false,
        })
    }

    #[must_use]
    pub fn agent_position(&self) -> Cell {
        self.agent_position
    }

    #[must_use]
    pub fn goal_position(&self) -> Cell {
        self.goal_position
    }

    #[must_use]
    pub fn reward_structure(&self) -> &RewardStructure {
        &self.reward_structure
    }
}

fn mark(field: &mut ArrayD<f32>, (row, col): Cell, value: f32) {
    let mut row_view = field.index_axis_mut(Axis(0), row);
    row_view.index_axis_mut(Axis(0), col).fill(value);
}

impl StaticEnvironment for GridEnvironment {
    type State = GridState;

    fn metadata(&self) -> &EnvironmentMetadata {
        &self.metadata
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn initialize(&mut self) -> Result<()> {
        self.agent_position = (0, 0);
        self.initialized = true;
        Ok(())
    }

    fn get_sensory_input(&self) -> Result<ArrayD<f32>> {
        self.ensure_initialized()?;
        let mut raw = ArrayD::<f32>::zeros(IxDyn(&self.metadata.sensory_output_shape));
        mark(&mut raw, self.agent_position, AGENT_MARKER);
        mark(&mut raw, self.goal_position, GOAL_MARKER);
        self.field.encode(RawState::Array(raw))
    }

    fn compute_reward(&mut self, action: i64) -> Result<f64> {
        self.ensure_initialized()?;
        let index = self.metadata.action_index(action)?;
        if let Some(movement) = GridMove::from_index(index) {
            self.agent_position = movement.apply(self.agent_position, self.extent);
        }
        Ok(if self.agent_position == self.goal_position {
            GOAL_REWARD
        } else {
            STEP_COST
        })
    }

    fn state_snapshot(&self) -> GridState {
        GridState {
            agent_position: self.agent_position,
            goal_position: self.goal_position,
            rows: self.extent.0,
            cols: self.extent.1,
        }
    }
}

impl fmt::Display for GridEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GridEnvironment(name={}, type={}, dims={:?})",
            self.metadata.name, self.metadata.environment_type, self.metadata.dimensions
        )
    }
}
