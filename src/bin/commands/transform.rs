use anyhow::{Context, Result, anyhow, bail};
use clap::Args;

use cell_forge::ops::Transform;
use cell_forge::{Structure, Vector};

use crate::commands::run_with_spinner;

/// Applies rigid geometric transforms to the structure.
#[derive(Debug, Args)]
pub struct TransformArgs {
    /// Move the geometric center to the origin.
    #[arg(long)]
    pub center: bool,
    /// Rotate about the axis given by --axis (degrees).
    #[arg(long, value_name = "DEG")]
    pub rotate: Option<f64>,
    /// Rotation axis (format: "x,y,z").
    #[arg(long, value_name = "X,Y,Z", default_value = "0,0,1")]
    pub axis: String,
    /// Translate by the provided vector (format: "x,y,z").
    #[arg(long, value_name = "X,Y,Z")]
    pub translate: Option<String>,
}

/// Executes the configured transformations in the prescribed order.
pub fn run(structure: &Structure, args: &TransformArgs) -> Result<Structure> {
    run_with_spinner("Applying transforms", || {
        let mut current = structure.clone();

        if args.center {
            current = Transform::center_geometry(&current, None);
        }

        if let Some(deg) = args.rotate {
            let axis = parse_vector(&args.axis, "rotation axis")?;
            let rotation = Transform::rotation_from_axis_angle(&axis, deg.to_radians())
                .context("Failed to build rotation")?;
            current = Transform::rotate(&current, &rotation);
        }

        if let Some(vector) = &args.translate {
            let displacement = parse_vector(vector, "translation")?;
            current = Transform::translate(&current, &displacement);
        }

        Ok(current)
    })
}

fn parse_vector(value: &str, label: &str) -> Result<Vector> {
    let parts: Vec<_> = value
        .split(',')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 {
        bail!("Invalid {label} '{value}'. Expected format 'x,y,z'.");
    }

    let mut components = [0.0; 3];
    for (slot, (part, axis)) in components.iter_mut().zip(parts.iter().zip(["X", "Y", "Z"])) {
        *slot = part
            .parse::<f64>()
            .map_err(|_| anyhow!("Invalid {axis} component in {label}: '{part}'"))?;
    }
    Ok(Vector::from(components))
}
