#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
//! # Static Environment Builders
//!
//! Concrete static worlds and the configuration-driven factory that produces
//! them.
//!
//! ## Key Components
//!
//! -   **Worlds:** [`GridEnvironment`] is a discrete grid with four-way moves
//!     toward a goal cell; [`ContinuousEnvironment`] is a Gaussian-sensed
//!     field with eight-way moves and a distance-shaped reward. Both are
//!     wrapped by the closed [`Environment`] enum.
//! -   **Configuration:** [`load_config`] reads YAML or JSON mappings and
//!     [`EnvironmentConfig`] gives them a typed shape.
//! -   **Factory:** [`build_environment`] validates a mapping, dispatches on
//!     `world.type` and returns an initialized environment.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blueprints::StaticEnvironment;
//! use builders::build_environment_from_config;
//!
//! let mut env = build_environment_from_config("configs/basic_grid.yaml")?;
//! let (sensory, reward, info) = env.step(1)?;
//! ```

pub mod builder;
pub mod config;
pub mod continuous;
pub mod environment;
pub mod grid;

pub use builder::{
    build_environment, build_environment_from_config, validate_continuous_config,
    validate_grid_config, ContinuousEnvironmentBuilder, GridEnvironmentBuilder,
};
pub use config::{load_config, EnvironmentConfig};
pub use continuous::{ContinuousEnvironment, ContinuousState};
pub use environment::{Environment, EnvironmentState};
pub use grid::{Cell, GridEnvironment, GridMove, GridState};
