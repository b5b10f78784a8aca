//! # Statica: Static Simulation Environments
//!
//! Fixed, reproducible worlds that hand a sensory observation and a
//! deterministic reward to an external controller. Nothing in a static world
//! changes on its own; the only state is where the agent stands.
//!
//! ## Project Architecture
//!
//! -   **`statica`:** The crate you are currently viewing. It is the entry
//!     point for the documentation and for the `statica` runner binary.
//! -   **[`blueprints`]:** The [`StaticEnvironment`] contract and its
//!     lifecycle, sensory field encoders, the world model and the error type
//!     shared by every crate.
//! -   **[`builders`]:** Configuration loading, the grid and continuous
//!     reference worlds, and the factory that turns a mapping into an
//!     initialized [`Environment`].
//! -   **[`validation`]:** Static configuration checks run before
//!     construction, and dynamic checks (sensory integrity, reward sanity,
//!     determinism) the caller may run afterwards.
//!
//! ## Flow
//!
//! A configuration mapping passes the [`ConfigValidator`], is dispatched on
//! `world.type` to a builder, and comes back as an initialized environment.
//! From there a consumer drives it with `reset` and `step`:
//!
//! ```rust,ignore
//! use statica::{build_environment_from_config, StaticEnvironment};
//!
//! let mut env = build_environment_from_config("configs/basic_grid.yaml")?;
//! let observation = env.reset()?;
//! let (observation, reward, info) = env.step(1)?;
//! ```

pub mod app;

pub use blueprints::{self, EnvError, EnvironmentMetadata, StaticEnvironment};
pub use builders::{self, build_environment, build_environment_from_config, Environment};
pub use validation::{self, ConfigValidator, ConsistencyChecker, EnvironmentValidator};
