use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use cell_forge::ops::{ConnectivityReport, analyze_connectivity};
use cell_forge::{CellParameters, Structure};

use crate::commands::run_with_spinner;

/// Report-only command that inspects a structure and mirrors the input stream.
#[derive(Debug, Default, Args)]
pub struct InfoArgs {}

/// Computes and prints structure statistics without mutating the structure.
pub fn run(structure: &Structure, _args: &InfoArgs) -> Result<()> {
    let (element_counts, cell_metrics, connectivity) =
        run_with_spinner("Analyzing structure", || {
            let counts = collect_element_counts(structure);
            let metrics = structure
                .cell
                .as_ref()
                .map(calculate_cell_metrics)
                .transpose()?;
            let connectivity =
                analyze_connectivity(structure).context("Failed to analyze connectivity")?;
            Ok((counts, metrics, connectivity))
        })?;

    let periodic_bonds = structure.bonds.iter().filter(|b| b.is_periodic()).count();
    print_tables(
        &element_counts,
        cell_metrics.as_ref(),
        &connectivity,
        periodic_bonds,
    )
}

fn collect_element_counts(structure: &Structure) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for element in structure.atoms.elements() {
        let label = if element.is_empty() {
            "?".to_string()
        } else {
            element.to_string()
        };
        *counts.entry(label).or_default() += 1;
    }
    counts
}

fn print_tables(
    element_counts: &BTreeMap<String, usize>,
    cell_metrics: Option<&CellMetrics>,
    connectivity: &ConnectivityReport,
    periodic_bonds: usize,
) -> Result<()> {
    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "CellForge Structure Report")?;
    writeln!(&mut stderr)?;

    let mut element_table = Table::new();
    print_boxed_label(&mut stderr, "Element Breakdown")?;
    element_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    element_table.set_titles(row!["Element", "Atoms"]);
    for (element, count) in element_counts {
        element_table.add_row(row![element, count]);
    }
    element_table
        .print(&mut stderr)
        .context("Failed to render element summary")?;
    writeln!(&mut stderr)?;

    let mut summary_table = Table::new();
    print_boxed_label(&mut stderr, "Structure Summary")?;
    summary_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    summary_table.set_titles(row!["Metric", "Value"]);
    summary_table.add_row(row!["Atoms", connectivity.atom_count]);
    summary_table.add_row(row![
        "Bonds",
        format!("{} ({} periodic)", connectivity.bond_count, periodic_bonds)
    ]);
    summary_table.add_row(row![
        "Connected Components",
        connectivity.connected_component_count
    ]);

    if let Some(metrics) = cell_metrics {
        let cell = &metrics.parameters;
        summary_table.add_row(row![
            "Cell Lengths (Å)",
            format!("a = {:.4}, b = {:.4}, c = {:.4}", cell.a, cell.b, cell.c)
        ]);
        summary_table.add_row(row![
            "Cell Angles (°)",
            format!(
                "α = {:.2}, β = {:.2}, γ = {:.2}",
                cell.alpha, cell.beta, cell.gamma
            )
        ]);
        summary_table.add_row(row!["Cell Volume (Å³)", format!("{:.3}", metrics.volume)]);
        summary_table.add_row(row!["Periodic", cell.pbc]);
        summary_table.add_row(row![
            "Space Group",
            cell.spacegroup.as_deref().unwrap_or("Not specified")
        ]);
    } else {
        summary_table.add_row(row!["Cell", "Not specified"]);
    }

    summary_table
        .print(&mut stderr)
        .context("Failed to render structure summary")?;

    Ok(())
}

fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}

#[derive(Debug)]
struct CellMetrics {
    parameters: CellParameters,
    volume: f64,
}

fn calculate_cell_metrics(cell: &CellParameters) -> Result<CellMetrics> {
    let lattice = cell
        .lattice()
        .with_context(|| format!("Invalid unit cell {cell}"))?;
    Ok(CellMetrics {
        parameters: cell.clone(),
        volume: lattice.volume(),
    })
}
