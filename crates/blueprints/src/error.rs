use std::path::PathBuf;

use thiserror::Error;

/// Errors raised anywhere along the config → build → run → validate pipeline.
#[derive(Error, Debug)]
pub enum EnvError {
    /// Missing or mistyped configuration field.
    #[error("config schema error: {0}")]
    ConfigSchema(String),
    /// Two configuration fields disagree with each other.
    #[error("config consistency error: {0}")]
    ConfigConsistency(String),
    /// The factory cannot build the requested world kind.
    #[error("construction error: {0}")]
    Construction(String),
    /// A query was made before `initialize()`.
    #[error("runtime state error: {0}")]
    RuntimeState(String),
    #[error("invalid action {action}: expected an index in [0, {num_actions})")]
    ActionRange { action: i64, num_actions: usize },
    #[error("{what} shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("unknown sensory field type: {0}")]
    UnknownFieldType(String),
    #[error("invalid sensory input: {0}")]
    InvalidSensoryInput(String),
    #[error("numeric integrity error: {0}")]
    NumericIntegrity(String),
    #[error("non-determinism detected: {0}")]
    NonDeterminism(String),
    #[error("reward out of expected bounds for action {action}: {reward}")]
    RewardOutOfBounds { action: i64, reward: f64 },
    /// Several failures collected by one validation pass.
    #[error("{summary}:\n{}", bullet_list(.errors))]
    ValidationAggregate { summary: String, errors: Vec<String> },
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {reason}", .path.display())]
    ConfigParse { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, EnvError>;

fn bullet_list(errors: &[String]) -> String {
    errors
        .iter()
        .map(|err| format!("  - {err}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_joins_every_message_with_a_bullet() {
        let err = EnvError::ValidationAggregate {
            summary: "Configuration validation failed".to_string(),
            errors: vec!["Missing required field: reward".into(), "Missing reward.type".into()],
        };
        assert_eq!(
            err.to_string(),
            "Configuration validation failed:\n  \
             - Missing required field: reward\n  \
             - Missing reward.type"
        );
    }

    #[test]
    fn action_range_names_the_bounds() {
        let err = EnvError::ActionRange { action: -1, num_actions: 4 };
        assert_eq!(err.to_string(), "invalid action -1: expected an index in [0, 4)");
    }
}
