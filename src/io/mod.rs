//! Input/Output operations for bond-length scans
//!
//! This module handles logging setup, per-point artifacts and the energy
//! curve plot.

mod artifacts;
mod output;
mod plot;

pub use artifacts::{
    format_parameter, write_curve, write_report, write_xyz, ArtifactLayout, PointArtifacts,
};
pub use output::setup_output;
#[cfg(test)]
pub(crate) use output::capture_logs;
pub use plot::{plot_energy_curve, PlotStyle};
