use anyhow::{Context, Result};
use clap::Args;

use cell_forge::ops::{ReplicateConfig, replicate_supercell};
use cell_forge::{Structure, Supercell};

use crate::commands::run_with_spinner;

/// Tiles the unit cell into a supercell.
#[derive(Debug, Args)]
pub struct ReplicateArgs {
    /// Replication factors along a, b, and c.
    #[arg(
        long,
        required = true,
        num_args = 3,
        value_names = ["NA", "NB", "NC"],
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub dims: Vec<u32>,
    /// Annotate every atom with the (i, j, k) tile it was copied into.
    #[arg(long = "image-indices")]
    pub image_indices: bool,
    /// Reconnect periodic bonds across tile boundaries instead of keeping them inside each tile.
    #[arg(long)]
    pub stitch: bool,
}

impl ReplicateArgs {
    fn config(&self) -> ReplicateConfig {
        ReplicateConfig::default()
            .with_image_indices(self.image_indices)
            .with_stitching(self.stitch)
    }

    fn factors(&self) -> [usize; 3] {
        let mut factors = [1usize; 3];
        for (slot, &value) in factors.iter_mut().zip(&self.dims) {
            *slot = value as usize;
        }
        factors
    }
}

/// Replicates the structure according to the requested factors.
pub fn run(structure: &Structure, args: &ReplicateArgs) -> Result<Supercell> {
    let [na, nb, nc] = args.factors();
    run_with_spinner(&format!("Replicating {na}x{nb}x{nc} supercell"), || {
        replicate_supercell(structure, [na, nb, nc], &args.config())
            .context("Failed to replicate supercell")
    })
}
