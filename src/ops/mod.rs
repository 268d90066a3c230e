//! Operations that interpret, tile, and check periodic structures.
//!
//! This module groups the public entry points for periodic workflows: coordinate transforms,
//! minimum-image bond perception, supercell replication, and connectivity validation. Each
//! submodule exposes a cohesive API and shares a common error type so downstream consumers can
//! chain the steps of a pipeline.

mod error;
mod perceive;
mod replicate;
mod tables;
mod transform;
mod validate;

pub use perceive::{perceive_periodic_bonds, periodic_bond_lengths};

pub use replicate::{ReplicateConfig, replicate_supercell};

pub use transform::Transform;

pub use validate::{ConnectivityReport, analyze_connectivity, validate_supercell};

pub use error::Error;
