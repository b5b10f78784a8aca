//! # Environment Builders
//!
//! Turns configuration mappings into ready-to-use environments. Each world
//! kind has its own builder that re-checks the preconditions specific to that
//! kind before assembling the [`WorldState`], [`EnvironmentMetadata`] and
//! [`RewardStructure`] it needs. [`build_environment`] validates the whole
//! mapping, picks the builder from `world.type` and initializes the result.
//!
//! No environment object exists until every check has passed.

use std::collections::BTreeMap;
use std::path::Path;

use blueprints::{
    create_sensory_field, EnvError, EnvironmentMetadata, FieldType, Result, RewardStructure,
    RewardType, SensoryField, SensoryFieldConfig, StaticEnvironment, WorldState, WorldStateConfig,
    WorldType,
};
use serde_json::Value;
use tracing::{debug, info};
use validation::ConfigValidator;

use crate::config::{load_config, EnvironmentConfig};
use crate::continuous::{ContinuousEnvironment, COMPASS_NAMES};
use crate::environment::Environment;
use crate::grid::{Cell, GridEnvironment, GridMove};

const REQUIRED_FIELDS: [&str; 5] = ["name", "world", "sensory", "actions", "reward"];

pub const GRID_DEFAULT_ACTIONS: usize = 4;
pub const CONTINUOUS_DEFAULT_ACTIONS: usize = 8;

fn require_fields(config: &Value) -> Result<()> {
    for field in REQUIRED_FIELDS {
        if config.get(field).is_none() {
            return Err(EnvError::ConfigSchema(format!("Missing required field: {field}")));
        }
    }
    Ok(())
}

fn positive_int(value: &Value) -> bool {
    value.as_u64().is_some_and(|v| v > 0)
}

/// Checks the preconditions a grid world needs.
///
/// # Errors
///
/// Returns [`EnvError::ConfigSchema`] describing the first problem found.
pub fn validate_grid_config(config: &Value) -> Result<()> {
    require_fields(config)?;

    if config.pointer("/world/type").and_then(Value::as_str) != Some("grid") {
        return Err(EnvError::ConfigSchema("Grid config must have world.type='grid'".into()));
    }

    let dimensions = config.pointer("/world/dimensions").and_then(Value::as_array);
    let Some(dimensions) = dimensions.filter(|dims| dims.len() >= 2) else {
        return Err(EnvError::ConfigSchema("Grid world must have at least 2 dimensions".into()));
    };
    if !dimensions.iter().all(positive_int) {
        return Err(EnvError::ConfigSchema("All dimensions must be positive integers".into()));
    }

    if let Some(num_actions) = config.pointer("/actions/num_actions") {
        if !positive_int(num_actions) {
            return Err(EnvError::ConfigSchema("Must have at least one action".into()));
        }
    }
    Ok(())
}

/// Checks the preconditions a continuous field needs.
///
/// # Errors
///
/// Returns [`EnvError::ConfigSchema`] describing the first problem found.
pub fn validate_continuous_config(config: &Value) -> Result<()> {
    require_fields(config)?;

    if config.pointer("/world/type").and_then(Value::as_str) != Some("continuous_field") {
        return Err(EnvError::ConfigSchema(
            "Continuous config must have world.type='continuous_field'".into(),
        ));
    }

    let dimensions = config.pointer("/world/dimensions").and_then(Value::as_array);
    let Some(dimensions) = dimensions.filter(|dims| !dims.is_empty()) else {
        return Err(EnvError::ConfigSchema(
            "Continuous world must have at least 1 dimension".into(),
        ));
    };
    if !dimensions.iter().all(positive_int) {
        return Err(EnvError::ConfigSchema("All dimensions must be positive integers".into()));
    }

    if let Some(channels) = config.pointer("/world/feature_channels") {
        if !positive_int(channels) {
            return Err(EnvError::ConfigSchema(
                "world.feature_channels must be a positive integer".into(),
            ));
        }
    }
    Ok(())
}

/// Pieces shared by both builders.
struct Assembly {
    world: WorldState,
    reward: RewardStructure,
    field: SensoryField,
}

fn assemble(
    config: &EnvironmentConfig,
    world_type: WorldType,
    field_type: FieldType,
    output_shape: Vec<usize>,
    default_actions: usize,
    default_reward: RewardType,
    describe_action: impl Fn(usize) -> &'static str,
) -> Result<Assembly> {
    let num_actions = config.actions.num_actions.unwrap_or(default_actions);

    let reward = RewardStructure {
        reward_type: config.reward.reward_type.unwrap_or(default_reward),
        values: config.reward.values.clone(),
        min_reward: config.reward.min_reward,
        max_reward: config.reward.max_reward,
        description: config.reward.description.clone(),
    };

    let mut metadata = BTreeMap::new();
    if let Some(description) = &config.description {
        metadata.insert("description".to_string(), Value::String(description.clone()));
    }

    let world = WorldStateConfig {
        name: Some(config.name.clone()),
        world_type: Some(world_type),
        dimensions: config.world.dimensions.clone(),
        sensory_encoding: config.sensory.encoding.clone(),
        sensory_output_shape: Some(output_shape.clone()),
        num_actions,
        action_descriptions: (0..num_actions)
            .map(|index| (index, describe_action(index).to_string()))
            .collect(),
        reward_structure: Some(reward.clone()),
        metadata,
        ..WorldStateConfig::default()
    }
    .build()?;

    let [min, max] = config.sensory.value_range;
    let field = create_sensory_field(SensoryFieldConfig::with_range(
        field_type,
        output_shape,
        config.sensory.encoding.clone(),
        (min, max),
        config.sensory.dtype,
    )?)?;

    Ok(Assembly { world, reward, field })
}

/// Builds [`GridEnvironment`]s from a configuration mapping.
#[derive(Debug, Clone)]
pub struct GridEnvironmentBuilder {
    config: EnvironmentConfig,
}

impl GridEnvironmentBuilder {
    /// # Errors
    ///
    /// Fails when the mapping does not describe a grid world.
    pub fn new(config: &Value) -> Result<Self> {
        validate_grid_config(config)?;
        Ok(Self {
            config: EnvironmentConfig::from_value(config)?,
        })
    }

    /// # Errors
    ///
    /// Fails when the assembled world, sensory field or goal is invalid.
    pub fn build(&self) -> Result<GridEnvironment> {
        let config = &self.config;
        let output_shape = config
            .sensory
            .output_shape
            .clone()
            .unwrap_or_else(|| config.world.dimensions.clone());

        let Assembly { world, reward, field } = assemble(
            config,
            WorldType::Grid,
            FieldType::Grid,
            output_shape,
            GRID_DEFAULT_ACTIONS,
            RewardType::Discrete,
            |index| GridMove::from_index(index).map_or("stay", GridMove::as_str),
        )?;
        let goal = config.world.goal_position.as_deref().map(grid_cell).transpose()?;

        debug!(name = %world.name(), dims = ?world.dimensions(), "building grid environment");
        GridEnvironment::new(EnvironmentMetadata::from(&world), reward, field, goal)
    }
}

fn grid_cell(coords: &[f64]) -> Result<Cell> {
    let as_index = |v: f64| (v >= 0.0 && v.fract() == 0.0).then_some(v as usize);
    let cell = match coords {
        &[row, col] => as_index(row).zip(as_index(col)),
        _ => None,
    };
    cell.ok_or_else(|| {
        EnvError::ConfigSchema(format!(
            "world.goal_position must be two non-negative integers, got {coords:?}"
        ))
    })
}

/// Builds [`ContinuousEnvironment`]s from a configuration mapping.
#[derive(Debug, Clone)]
pub struct ContinuousEnvironmentBuilder {
    config: EnvironmentConfig,
}

impl ContinuousEnvironmentBuilder {
    /// # Errors
    ///
    /// Fails when the mapping does not describe a continuous field.
    pub fn new(config: &Value) -> Result<Self> {
        validate_continuous_config(config)?;
        Ok(Self {
            config: EnvironmentConfig::from_value(config)?,
        })
    }

    /// # Errors
    ///
    /// Fails when the assembled world, sensory field or goal is invalid.
    pub fn build(&self) -> Result<ContinuousEnvironment> {
        let config = &self.config;
        let channels = config.world.feature_channels;
        let output_shape = config.sensory.output_shape.clone().unwrap_or_else(|| {
            let mut shape = config.world.dimensions.clone();
            shape.push(channels);
            shape
        });

        let Assembly { world, reward, field } = assemble(
            config,
            WorldType::ContinuousField,
            FieldType::Continuous,
            output_shape,
            CONTINUOUS_DEFAULT_ACTIONS,
            RewardType::Continuous,
            |index| COMPASS_NAMES.get(index).copied().unwrap_or("stay"),
        )?;
        let goal = match config.world.goal_position.as_deref() {
            None => None,
            Some(&[x, y]) => Some([x, y]),
            Some(other) => {
                return Err(EnvError::ConfigSchema(format!(
                    "world.goal_position must have two coordinates, got {other:?}"
                )))
            }
        };

        debug!(
            name = %world.name(),
            dims = ?world.dimensions(),
            channels,
            "building continuous environment"
        );
        ContinuousEnvironment::new(EnvironmentMetadata::from(&world), reward, field, channels, goal)
    }
}

/// Validates `config`, builds the environment its `world.type` names and
/// initializes it.
///
/// # Errors
///
/// Returns [`EnvError::ValidationAggregate`] when the static checks fail,
/// [`EnvError::Construction`] for a world type without a builder, and any
/// builder error otherwise.
pub fn build_environment(config: &Value) -> Result<Environment> {
    ConfigValidator::validate_all(config)?;

    let world_type = config
        .pointer("/world/type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let mut env: Environment = match world_type.parse::<WorldType>()? {
        WorldType::Grid => GridEnvironmentBuilder::new(config)?.build()?.into(),
        WorldType::ContinuousField => ContinuousEnvironmentBuilder::new(config)?.build()?.into(),
        WorldType::Abstract => {
            return Err(EnvError::Construction(
                "world type 'abstract' has no environment builder".into(),
            ))
        }
    };

    env.initialize()?;
    info!(environment = %env, "environment ready");
    Ok(env)
}

/// Loads the mapping at `path` and hands it to [`build_environment`].
///
/// # Errors
///
/// Returns loading errors and everything [`build_environment`] can return.
pub fn build_environment_from_config(path: impl AsRef<Path>) -> Result<Environment> {
    let config = load_config(path)?;
    build_environment(&config)
}
