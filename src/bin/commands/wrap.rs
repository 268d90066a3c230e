use anyhow::{Context, Result};
use clap::Args;

use cell_forge::Structure;
use cell_forge::ops::Transform;

use crate::commands::run_with_spinner;

/// Moves every atom into the primary unit cell.
#[derive(Debug, Default, Args)]
pub struct WrapArgs {}

/// Wraps coordinates so that fractional components fall in `[0, 1)`.
pub fn run(structure: &Structure, _args: &WrapArgs) -> Result<Structure> {
    run_with_spinner("Wrapping atoms into the cell", || {
        Transform::wrap_to_cell(structure).context("Failed to wrap coordinates")
    })
}
