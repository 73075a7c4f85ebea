//! Energy solvers consumed by the sweep
//!
//! A solver turns one periodic structure into one total energy (eV). It owns
//! its log file and, on request, serialises its state to a checkpoint.

pub mod gpaw;
pub mod morse;

pub use gpaw::GpawSolver;
pub use morse::MorseSolver;

use crate::structure::Structure;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Numerical settings bundle for a ground-state calculation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SolverSettings {
    pub mode: String,
    pub basis: String,
    pub xc: String,
    pub kpts: [usize; 3],
    /// Fermi-Dirac smearing width (eV)
    pub smearing_width: f64,
    /// Energy convergence threshold (eV per valence electron)
    pub energy_convergence: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            mode: "lcao".to_string(),
            basis: "dzp".to_string(),
            xc: "PBE".to_string(),
            kpts: [10, 10, 1],
            smearing_width: 0.05,
            energy_convergence: 1e-5,
        }
    }
}

/// Files a solver writes for one structure
#[derive(Debug, Clone, PartialEq)]
pub struct SolverFiles {
    pub log: PathBuf,
    pub checkpoint: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("solver I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("solver exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("malformed solver reply: {0}")]
    MalformedReply(String),
    #[error("solver returned a non-finite energy ({0})")]
    NonFiniteEnergy(f64),
    #[error("failed to write checkpoint {}: {reason}", .path.display())]
    Checkpoint { path: PathBuf, reason: String },
}

/// Anything that can produce the potential energy of a periodic structure.
pub trait EnergySolver: Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Evaluate the total potential energy (eV), writing the log and, if
    /// requested, the checkpoint named in `files`.
    fn potential_energy(
        &self,
        structure: &Structure,
        files: &SolverFiles,
    ) -> Result<f64, SolverError>;
}

pub(crate) fn ensure_finite(energy: f64) -> Result<f64, SolverError> {
    if energy.is_finite() {
        Ok(energy)
    } else {
        Err(SolverError::NonFiniteEnergy(energy))
    }
}
