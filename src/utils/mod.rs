//! Internal helpers shared by the model and operations layers.

pub mod parallel;
