//! The closed set of environment kinds the factory can produce.

use std::fmt;

use blueprints::{EnvironmentMetadata, Result, StaticEnvironment};
use ndarray::ArrayD;
use serde::Serialize;

use crate::continuous::{ContinuousEnvironment, ContinuousState};
use crate::grid::{GridEnvironment, GridState};

/// Any environment built from a configuration.
#[derive(Debug, Clone)]
pub enum Environment {
    Grid(GridEnvironment),
    Continuous(ContinuousEnvironment),
}

/// Runtime state of an [`Environment`], tagged by kind when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvironmentState {
    Grid(GridState),
    Continuous(ContinuousState),
}

impl Environment {
    #[must_use]
    pub fn as_grid(&self) -> Option<&GridEnvironment> {
        match self {
            Environment::Grid(env) => Some(env),
            Environment::Continuous(_) => None,
        }
    }

    #[must_use]
    pub fn as_continuous(&self) -> Option<&ContinuousEnvironment> {
        match self {
            Environment::Continuous(env) => Some(env),
            Environment::Grid(_) => None,
        }
    }
}

impl From<GridEnvironment> for Environment {
    fn from(env: GridEnvironment) -> Self {
        Environment::Grid(env)
    }
}

impl From<ContinuousEnvironment> for Environment {
    fn from(env: ContinuousEnvironment) -> Self {
        Environment::Continuous(env)
    }
}

impl StaticEnvironment for Environment {
    type State = EnvironmentState;

    fn metadata(&self) -> &EnvironmentMetadata {
        match self {
            Environment::Grid(env) => env.metadata(),
            Environment::Continuous(env) => env.metadata(),
        }
    }

    fn is_initialized(&self) -> bool {
        match self {
            Environment::Grid(env) => env.is_initialized(),
            Environment::Continuous(env) => env.is_initialized(),
        }
    }

    fn initialize(&mut self) -> Result<()> {
        match self {
            Environment::Grid(env) => env.initialize(),
            Environment::Continuous(env) => env.initialize(),
        }
    }

    fn get_sensory_input(&self) -> Result<ArrayD<f32>> {
        match self {
            Environment::Grid(env) => env.get_sensory_input(),
            Environment::Continuous(env) => env.get_sensory_input(),
        }
    }

    fn compute_reward(&mut self, action: i64) -> Result<f64> {
        match self {
            Environment::Grid(env) => env.compute_reward(action),
            Environment::Continuous(env) => env.compute_reward(action),
        }
    }

    fn state_snapshot(&self) -> EnvironmentState {
        match self {
            Environment::Grid(env) => EnvironmentState::Grid(env.state_snapshot()),
            Environment::Continuous(env) => EnvironmentState::Continuous(env.state_snapshot()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Grid(env) => fmt::Display::fmt(env, f),
            Environment::Continuous(env) => fmt::Display::fmt(env, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ContinuousEnvironmentBuilder, GridEnvironmentBuilder};
    use blueprints::EnvError;
    use serde_json::{json, Value};

    fn config(world: Value) -> Value {
        json!({
            "name": "wrapped",
            "world": world,
            "sensory": {"encoding": "one_hot"},
            "actions": {},
            "reward": {"type": "discrete"},
        })
    }

    fn unbuilt() -> [Environment; 2] {
        let grid = config(json!({"type": "grid", "dimensions": [3, 3]}));
        let field = config(json!({"type": "continuous_field", "dimensions": [3, 3]}));
        [
            GridEnvironmentBuilder::new(&grid).unwrap().build().unwrap().into(),
            ContinuousEnvironmentBuilder::new(&field).unwrap().build().unwrap().into(),
        ]
    }

    #[test]
    fn both_kinds_start_uninitialized() {
        for mut env in unbuilt() {
            assert!(!env.is_initialized());
            assert!(matches!(env.get_sensory_input(), Err(EnvError::RuntimeState(_))));
            assert!(matches!(env.compute_reward(0), Err(EnvError::RuntimeState(_))));
            assert!(matches!(env.step(0), Err(EnvError::RuntimeState(_))));
            assert!(matches!(env.get_state(), Err(EnvError::RuntimeState(_))));
        }
    }

    #[test]
    fn accessors_match_the_kind() {
        let [grid, field] = unbuilt();
        assert!(grid.as_grid().is_some() && grid.as_continuous().is_none());
        assert!(field.as_continuous().is_some() && field.as_grid().is_none());
    }

    #[test]
    fn continuous_state_is_tagged() {
        let [_, mut field] = unbuilt();
        field.initialize().unwrap();
        let state = serde_json::to_value(field.get_state().unwrap()).unwrap();
        assert_eq!(state["kind"], "continuous");
        assert_eq!(state["agent_position"], json!([0.0, 0.0]));
    }
}
