//! Loading configuration mappings from disk and reading them into typed sections.

use std::fs;
use std::path::Path;

use blueprints::{ElementType, EnvError, Result, RewardType};
use serde::Deserialize;
use serde_json::Value;

/// Reads a YAML (`.yaml`/`.yml`) or JSON file into a configuration mapping.
///
/// # Errors
///
/// Returns [`EnvError::ConfigRead`] when the file cannot be read and
/// [`EnvError::ConfigParse`] when it does not hold a mapping.
pub fn load_config(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| EnvError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed: Value = if is_yaml {
        serde_yaml::from_str(&text).map_err(|e| parse_error(path, e))?
    } else {
        serde_json::from_str(&text).map_err(|e| parse_error(path, e))?
    };

    if !parsed.is_object() {
        return Err(EnvError::ConfigParse {
            path: path.to_path_buf(),
            reason: "Config must be a mapping".into(),
        });
    }
    Ok(parsed)
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> EnvError {
    EnvError::ConfigParse {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Typed view of a validated configuration mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub world: WorldSection,
    pub sensory: SensorySection,
    #[serde(default)]
    pub actions: ActionsSection,
    #[serde(default)]
    pub reward: RewardSection,
}

impl EnvironmentConfig {
    /// # Errors
    ///
    /// Returns [`EnvError::ConfigSchema`] when a field has the wrong type.
    pub fn from_value(config: &Value) -> Result<Self> {
        Self::deserialize(config).map_err(|e| EnvError::ConfigSchema(e.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorldSection {
    #[serde(rename = "type")]
    pub world_type: String,
    pub dimensions: Vec<usize>,
    #[serde(default = "default_feature_channels")]
    pub feature_channels: usize,
    #[serde(default)]
    pub goal_position: Option<Vec<f64>>,
}

fn default_feature_channels() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorySection {
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub output_shape: Option<Vec<usize>>,
    #[serde(default = "default_value_range")]
    pub value_range: [f32; 2],
    #[serde(default)]
    pub dtype: ElementType,
}

fn default_encoding() -> String {
    "one_hot".to_string()
}

fn default_value_range() -> [f32; 2] {
    [0.0, 1.0]
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionsSection {
    #[serde(default)]
    pub num_actions: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardSection {
    #[serde(rename = "type", default)]
    pub reward_type: Option<RewardType>,
    #[serde(default = "default_min_reward")]
    pub min_reward: f64,
    #[serde(default = "default_max_reward")]
    pub max_reward: f64,
    #[serde(default)]
    pub values: Option<Vec<f64>>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for RewardSection {
    fn default() -> Self {
        Self {
            reward_type: None,
            min_reward: default_min_reward(),
            max_reward: default_max_reward(),
            values: None,
            description: None,
        }
    }
}

fn default_min_reward() -> f64 {
    -1.0
}

fn default_max_reward() -> f64 {
    1.0
}
