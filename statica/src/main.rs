//! # Statica Runner
//!
//! Builds a static environment from a YAML or JSON configuration and drives
//! it from the command line.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use statica::app::{self, RunOptions};

/// Command-line arguments for the `statica` binary.
#[derive(Parser, Debug)]
#[command(name = "statica", about = "Run a static simulation environment")]
struct Cli {
    /// Path to the environment configuration (`.yaml`, `.yml` or `.json`).
    config: PathBuf,

    /// Number of steps to take.
    #[arg(long, default_value_t = 10)]
    steps: usize,

    /// Comma-separated actions to cycle through, e.g. `1,1,3`.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    actions: Vec<i64>,

    /// Run every dynamic check before stepping.
    #[arg(long)]
    validate: bool,

    /// Actions replayed by the determinism check.
    #[arg(long, default_value_t = 10)]
    samples: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    app::run(&RunOptions {
        config: cli.config,
        steps: cli.steps,
        actions: cli.actions,
        validate: cli.validate,
        samples: cli.samples,
    })?;
    Ok(())
}
