//! # World State
//!
//! Immutable description of a static world: its shape, how it is sensed,
//! which actions it offers and how it rewards them. A [`WorldState`] can only
//! be obtained through [`WorldStateConfig::build`], which validates the
//! description once so every holder can rely on it afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EnvError, Result};

/// Closed set of world kinds a configuration may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldType {
    Grid,
    ContinuousField,
    Abstract,
}

impl WorldType {
    pub const ALL: [WorldType; 3] = [
        WorldType::Grid,
        WorldType::ContinuousField,
        WorldType::Abstract,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WorldType::Grid => "grid",
            WorldType::ContinuousField => "continuous_field",
            WorldType::Abstract => "abstract",
        }
    }
}

impl FromStr for WorldType {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self> {
        WorldType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EnvError::Construction(format!("Unknown world type: {s}")))
    }
}

impl fmt::Display for WorldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    Discrete,
    Continuous,
    Sparse,
}

impl RewardType {
    pub const ALL: [RewardType; 3] = [
        RewardType::Discrete,
        RewardType::Continuous,
        RewardType::Sparse,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RewardType::Discrete => "discrete",
            RewardType::Continuous => "continuous",
            RewardType::Sparse => "sparse",
        }
    }
}

impl FromStr for RewardType {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self> {
        RewardType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EnvError::ConfigSchema(format!("Unknown reward type: {s}")))
    }
}

impl fmt::Display for RewardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared kind and bounds of the rewards a world emits.
///
/// The bounds are not checked here; ordering is the validator's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardStructure {
    pub reward_type: RewardType,
    #[serde(default)]
    pub values: Option<Vec<f64>>,
    pub min_reward: f64,
    pub max_reward: f64,
    #[serde(default)]
    pub description: Option<String>,
}

impl RewardStructure {
    /// A reward structure with the default `[-1, 1]` bounds.
    #[must_use]
    pub fn new(reward_type: RewardType) -> Self {
        Self {
            reward_type,
            values: None,
            min_reward: -1.0,
            max_reward: 1.0,
            description: None,
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, min_reward: f64, max_reward: f64) -> Self {
        self.min_reward = min_reward;
        self.max_reward = max_reward;
        self
    }

    #[must_use]
    pub fn has_ordered_bounds(&self) -> bool {
        self.min_reward < self.max_reward
    }
}

/// Plain description of a world, validated into a [`WorldState`] by [`build`].
///
/// Fill the fields you need and take the rest from `Default`:
///
/// ```
/// use blueprints::{WorldStateConfig, WorldType};
///
/// let world = WorldStateConfig {
///     name: Some("maze".into()),
///     world_type: Some(WorldType::Grid),
///     dimensions: vec![10, 10],
///     ..WorldStateConfig::default()
/// }
/// .build()
/// .unwrap();
/// assert_eq!(world.compute_total_states(), Some(100));
/// ```
///
/// [`build`]: WorldStateConfig::build
#[derive(Debug, Clone, PartialEq)]
pub struct WorldStateConfig {
    pub name: Option<String>,
    pub world_type: Option<WorldType>,
    pub dimensions: Vec<usize>,
    pub sensory_encoding: String,
    /// Defaults to `dimensions` when absent.
    pub sensory_output_shape: Option<Vec<usize>>,
    pub num_actions: usize,
    pub action_descriptions: BTreeMap<usize, String>,
    pub reward_structure: Option<RewardStructure>,
    pub state_data: BTreeMap<String, Value>,
    pub metadata: BTreeMap<String, Value>,
}

impl Default for WorldStateConfig {
    fn default() -> Self {
        Self {
            name: None,
            world_type: None,
            dimensions: Vec::new(),
            sensory_encoding: "one_hot".to_string(),
            sensory_output_shape: None,
            num_actions: 4,
            action_descriptions: BTreeMap::new(),
            reward_structure: None,
            state_data: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }
}

impl WorldStateConfig {
    /// Validates the description and freezes it.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ConfigSchema`] when the name or world type is
    /// missing, the name is empty, there are no dimensions, any dimension is
    /// zero, or fewer than one action is declared.
    pub fn build(self) -> Result<WorldState> {
        let (Some(name), Some(world_type)) = (self.name, self.world_type) else {
            return Err(EnvError::ConfigSchema("name and world_type are required".into()));
        };
        if name.is_empty() {
            return Err(EnvError::ConfigSchema("World must have a name".into()));
        }
        if self.dimensions.is_empty() {
            return Err(EnvError::ConfigSchema("World must have at least one dimension".into()));
        }
        if self.dimensions.contains(&0) {
            return Err(EnvError::ConfigSchema("All dimensions must be positive integers".into()));
        }
        if self.num_actions < 1 {
            return Err(EnvError::ConfigSchema("Must have at least one action".into()));
        }

        let sensory_output_shape = self
            .sensory_output_shape
            .unwrap_or_else(|| self.dimensions.clone());

        Ok(WorldState {
            name,
            world_type,
            dimensions: self.dimensions,
            sensory_encoding: self.sensory_encoding,
            sensory_output_shape,
            num_actions: self.num_actions,
            action_descriptions: self.action_descriptions,
            reward_structure: self.reward_structure,
            state_data: self.state_data,
            metadata: self.metadata,
        })
    }
}

/// Immutable, validated world description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldState {
    name: String,
    world_type: WorldType,
    dimensions: Vec<usize>,
    sensory_encoding: String,
    sensory_output_shape: Vec<usize>,
    num_actions: usize,
    action_descriptions: BTreeMap<usize, String>,
    reward_structure: Option<RewardStructure>,
    state_data: BTreeMap<String, Value>,
    metadata: BTreeMap<String, Value>,
}

impl WorldState {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn world_type(&self) -> WorldType {
        self.world_type
    }

    #[must_use]
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    #[must_use]
    pub fn sensory_encoding(&self) -> &str {
        &self.sensory_encoding
    }

    #[must_use]
    pub fn sensory_output_shape(&self) -> &[usize] {
        &self.sensory_output_shape
    }

    #[must_use]
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    #[must_use]
    pub fn action_descriptions(&self) -> &BTreeMap<usize, String> {
        &self.action_descriptions
    }

    #[must_use]
    pub fn reward_structure(&self) -> Option<&RewardStructure> {
        self.reward_structure.as_ref()
    }

    /// # Errors
    ///
    /// Returns [`EnvError::ConfigSchema`] naming `key` when it is absent.
    pub fn get_state_property(&self, key: &str) -> Result<&Value> {
        self.state_data
            .get(key)
            .ok_or_else(|| EnvError::ConfigSchema(format!("state property not found: {key}")))
    }

    #[must_use]
    pub fn get_state_property_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.state_data.get(key).unwrap_or(default)
    }

    #[must_use]
    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Number of distinct discrete states.
    ///
    /// `None` when the world is not a grid and therefore has unboundedly many,
    /// and also when the product of the dimensions does not fit in a `u64`.
    #[must_use]
    pub fn compute_total_states(&self) -> Option<u64> {
        match self.world_type {
            WorldType::Grid => self
                .dimensions
                .iter()
                .try_fold(1_u64, |total, &dim| total.checked_mul(u64::try_from(dim).ok()?)),
            WorldType::ContinuousField | WorldType::Abstract => None,
        }
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WorldState(name={}, type={}, dims={:?}, actions={})",
            self.name, self.world_type, self.dimensions, self.num_actions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid_config() -> WorldStateConfig {
        WorldStateConfig {
            name: Some("grid".into()),
            world_type: Some(WorldType::Grid),
            dimensions: vec![4, 5],
            ..WorldStateConfig::default()
        }
    }

    #[test]
    fn output_shape_defaults_to_dimensions() {
        let world = grid_config().build().unwrap();
        assert_eq!(world.sensory_output_shape(), &[4, 5]);
        assert_eq!(world.num_actions(), 4);
        assert_eq!(world.sensory_encoding(), "one_hot");
    }

    #[test]
    fn build_requires_name_and_type() {
        let missing_type = WorldStateConfig { world_type: None, ..grid_config() };
        assert!(matches!(missing_type.build(), Err(EnvError::ConfigSchema(_))));
        let missing_name = WorldStateConfig { name: None, ..grid_config() };
        assert!(matches!(missing_name.build(), Err(EnvError::ConfigSchema(_))));
    }

    #[test]
    fn invalid_worlds_fail_at_build() {
        let cases = [
            WorldStateConfig { name: Some(String::new()), ..grid_config() },
            WorldStateConfig { dimensions: vec![], ..grid_config() },
            WorldStateConfig { dimensions: vec![3, 0], ..grid_config() },
            WorldStateConfig { num_actions: 0, ..grid_config() },
        ];
        for case in cases {
            assert!(case.build().is_err());
        }
    }

    #[test]
    fn total_states_is_product_for_grids_only() {
        assert_eq!(grid_config().build().unwrap().compute_total_states(), Some(20));
        let field = WorldStateConfig {
            world_type: Some(WorldType::ContinuousField),
            ..grid_config()
        };
        assert_eq!(field.build().unwrap().compute_total_states(), None);
    }

    #[test]
    fn total_states_overflow_is_unbounded() {
        let huge = WorldStateConfig {
            dimensions: vec![1 << 32, 1 << 32],
            ..grid_config()
        };
        assert_eq!(huge.build().unwrap().compute_total_states(), None);

        let edge = WorldStateConfig {
            dimensions: vec![1 << 32, (1 << 32) - 1],
            ..grid_config()
        };
        assert_eq!(
            edge.build().unwrap().compute_total_states(),
            Some(u64::MAX - u64::from(u32::MAX))
        );
    }

    #[test]
    fn state_properties_and_metadata() {
        let mut config = grid_config();
        config.state_data.insert("walls".into(), json!([[1, 1]]));
        config.metadata.insert("author".into(), json!("lab"));
        let world = config.build().unwrap();

        assert_eq!(world.get_state_property("walls").unwrap(), &json!([[1, 1]]));
        assert!(world.get_state_property("doors").is_err());
        let fallback = json!(0);
        assert_eq!(world.get_state_property_or("doors", &fallback), &json!(0));
        assert_eq!(world.get_metadata("author"), Some(&json!("lab")));
        assert_eq!(world.get_metadata("license"), None);
    }

    #[test]
    fn reward_bounds_are_not_enforced_by_the_structure() {
        let reward = RewardStructure::new(RewardType::Sparse).with_bounds(1.0, 1.0);
        assert!(!reward.has_ordered_bounds());
    }

    #[test]
    fn world_type_tags_round_trip_through_strings() {
        for kind in WorldType::ALL {
            assert_eq!(kind.as_str().parse::<WorldType>().unwrap(), kind);
        }
        assert!(matches!("hex".parse::<WorldType>(), Err(EnvError::Construction(_))));
    }
}
