use anyhow::{Context, Result, bail};
use clap::Args;

use cell_forge::Structure;
use cell_forge::ops::{ConnectivityReport, analyze_connectivity};

use crate::commands::run_with_spinner;

/// Reports atom, bond, and connected-component counts.
#[derive(Debug, Default, Args)]
pub struct ValidateArgs {
    /// Fail unless the structure has exactly this many connected components.
    #[arg(long = "expect-components", value_name = "N")]
    pub expect_components: Option<usize>,
}

/// Computes the connectivity report and checks it against the expectation, if any.
pub fn run(structure: &Structure, args: &ValidateArgs) -> Result<ConnectivityReport> {
    let report = run_with_spinner("Analyzing connectivity", || {
        analyze_connectivity(structure).context("Failed to analyze connectivity")
    })?;

    if let Some(expected) = args.expect_components {
        if report.connected_component_count != expected {
            bail!(
                "Expected {expected} connected component(s) but found {} ({} atoms, {} bonds)",
                report.connected_component_count,
                report.atom_count,
                report.bond_count
            );
        }
    }

    Ok(report)
}
