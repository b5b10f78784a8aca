#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Static Environment Validation
//!
//! Layered correctness checks for static environments. [`ConfigValidator`]
//! runs over a configuration mapping before anything is built;
//! [`EnvironmentValidator`] and [`ConsistencyChecker`] run against a live
//! environment afterwards and are invoked by the caller when wanted.
//!
//! Collecting validators report every problem through
//! [`blueprints::EnvError::ValidationAggregate`]. The determinism check stops at
//! the first divergence.

pub mod config;
pub mod consistency;
pub mod environment;

pub use config::ConfigValidator;
pub use consistency::{allclose, ConsistencyChecker, REWARD_SANITY_BOUND};
pub use environment::EnvironmentValidator;
