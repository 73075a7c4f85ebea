use crate::config::SolverConfig;
use crate::solver::{EnergySolver, GpawSolver, MorseSolver};
use color_eyre::eyre::{ensure, Result};
use tracing::info;

/// Instantiate the configured energy solver.
pub fn build_solver(config: &SolverConfig) -> Result<Box<dyn EnergySolver>> {
    match config {
        SolverConfig::Gpaw(params) => {
            let settings = params.settings();
            ensure!(
                settings.kpts.iter().all(|&k| k > 0),
                "k-point grid must be positive, got {:?}",
                settings.kpts
            );
            ensure!(
                settings.smearing_width >= 0.0,
                "Smearing width must be non-negative, got {}",
                settings.smearing_width
            );
            info!(
                "Using GPAW ({} mode, {} basis, {} functional, k-points {:?}, Fermi-Dirac width {} eV, energy convergence {:e})",
                settings.mode,
                settings.basis,
                settings.xc,
                settings.kpts,
                settings.smearing_width,
                settings.energy_convergence
            );
            Ok(Box::new(GpawSolver::new(params.python(), settings)))
        }
        SolverConfig::Morse(params) => {
            let solver = MorseSolver::from_params(params);
            ensure!(
                solver.cutoff > 0.0 && solver.width > 0.0,
                "Morse width and cutoff must be positive"
            );
            info!(
                "Using Morse pair model (D={} eV, a={} 1/Å, r0={} Å, cutoff={} Å)",
                solver.well_depth, solver.width, solver.equilibrium_distance, solver.cutoff
            );
            Ok(Box::new(solver))
        }
    }
}
