#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]
//! # Static Environment Blueprints
//!
//! Core abstractions for fixed, reproducible simulation worlds that expose a
//! sensory observation and a deterministic reward to an external controller.
//!
//! ## Key Components
//!
//! -   **Environment contract:** [`StaticEnvironment`] in the [`environment`]
//!     module defines the uninitialized → initialized lifecycle together with
//!     `reset`, `step`, `get_state` and `validate`, all built on three
//!     world-specific operations.
//! -   **Sensory fields:** the [`sensory`] module turns raw state into bounded
//!     arrays through the [`GridField`], [`ContinuousField`] and
//!     [`FeatureVectorField`] encoders.
//! -   **World model:** [`WorldState`] and [`RewardStructure`] in the
//!     [`world`] module describe a world's shape, actions and reward semantics.
//! -   **Errors:** every fallible operation returns [`EnvError`].
//!
//! Concrete environments and the configuration-driven factory live in the
//! `builders` crate; validators live in the `validation` crate.

pub mod environment;
pub mod error;
pub mod sensory;
pub mod world;

pub use environment::{EnvironmentMetadata, StaticEnvironment, StepInfo, StepResult};
pub use error::{EnvError, Result};
pub use sensory::{
    create_sensory_field, ContinuousField, ElementType, Encoder, FeatureVectorField, FieldType,
    GridField, RawState, SensoryField, SensoryFieldConfig,
};
pub use world::{RewardStructure, RewardType, WorldState, WorldStateConfig, WorldType};
