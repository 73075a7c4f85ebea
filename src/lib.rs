// Main library file for lattice-spacing energy scans

pub mod app;
pub mod config;
pub mod io;
pub mod solver;
pub mod structure;
pub mod sweep;

pub use solver::{EnergySolver, SolverError, SolverFiles, SolverSettings};
pub use structure::{PairCellBuilder, Structure, UnitCell};
pub use sweep::{CurveMinimum, EnergyCurve, LatticeSweep, SweepRunner};
