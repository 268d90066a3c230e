use anyhow::{Context, Result};
use clap::Args;

use cell_forge::Structure;
use cell_forge::ops::perceive_periodic_bonds;

use crate::commands::run_with_spinner;

/// Assigns minimum-image offsets to bonds that cross cell faces.
#[derive(Debug, Default, Args)]
pub struct PerceiveArgs {}

/// Recomputes every bond's periodic image offset from the atom positions.
pub fn run(structure: &Structure, _args: &PerceiveArgs) -> Result<Structure> {
    run_with_spinner("Perceiving periodic bonds", || {
        perceive_periodic_bonds(structure).context("Failed to perceive periodic bonds")
    })
}
