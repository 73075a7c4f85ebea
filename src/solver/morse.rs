//! Periodic Morse pair model
//!
//! V(r) = D [(1 - exp(-a (r - r0)))^2 - 1], summed over every atom pair and
//! every periodic image closer than the cutoff. Cheap and deterministic, so
//! it stands in for the electronic-structure backend on dry runs.

use super::{ensure_finite, EnergySolver, SolverError, SolverFiles};
use crate::structure::Structure;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::debug;

/// Morse parameters as read from the configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MorseParams {
    /// Well depth D (eV)
    pub well_depth: Option<f64>,
    /// Well width a (1/Å)
    pub width: Option<f64>,
    /// Equilibrium distance r0 (Å)
    pub equilibrium_distance: Option<f64>,
    /// Interaction cutoff (Å)
    pub cutoff: Option<f64>,
}

impl Default for MorseParams {
    fn default() -> Self {
        MorseParams {
            well_depth: Some(1.0),
            width: Some(1.5),
            equilibrium_distance: Some(2.0),
            cutoff: Some(6.0),
        }
    }
}

impl MorseParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.well_depth.is_none() {
            self.well_depth = defaults.well_depth;
        }
        if self.width.is_none() {
            self.width = defaults.width;
        }
        if self.equilibrium_distance.is_none() {
            self.equilibrium_distance = defaults.equilibrium_distance;
        }
        if self.cutoff.is_none() {
            self.cutoff = defaults.cutoff;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MorseSolver {
    pub well_depth: f64,
    pub width: f64,
    pub equilibrium_distance: f64,
    pub cutoff: f64,
}

#[derive(Serialize)]
struct MorseCheckpoint<'a> {
    formula: String,
    symbols: Vec<&'static str>,
    positions: Vec<[f64; 3]>,
    cell: [[f64; 3]; 3],
    pbc: [bool; 3],
    model: &'a MorseSolver,
    energy: f64,
}

impl MorseSolver {
    pub fn new(well_depth: f64, width: f64, equilibrium_distance: f64, cutoff: f64) -> Self {
        MorseSolver {
            well_depth,
            width,
            equilibrium_distance,
            cutoff,
        }
    }

    pub fn from_params(params: &MorseParams) -> Self {
        let defaults = MorseParams::default();
        MorseSolver::new(
            params.well_depth.or(defaults.well_depth).unwrap_or(1.0),
            params.width.or(defaults.width).unwrap_or(1.5),
            params
                .equilibrium_distance
                .or(defaults.equilibrium_distance)
                .unwrap_or(2.0),
            params.cutoff.or(defaults.cutoff).unwrap_or(6.0),
        )
    }

    pub fn pair_energy(&self, r: f64) -> f64 {
        let x = 1.0 - (-self.width * (r - self.equilibrium_distance)).exp();
        self.well_depth * (x * x - 1.0)
    }

    /// Total energy of the structure with each pair counted once.
    pub fn total_energy(&self, structure: &Structure) -> f64 {
        let cell = &structure.cell;
        let mut reach = [0i64; 3];
        for k in 0..3 {
            if cell.pbc[k] {
                reach[k] = (self.cutoff / cell.lengths[k]).ceil() as i64;
            }
        }

        let cutoff2 = self.cutoff * self.cutoff;
        let mut energy = 0.0;
        for (i, ri) in structure.positions.iter().enumerate() {
            for (j, rj) in structure.positions.iter().enumerate() {
                for nx in -reach[0]..=reach[0] {
                    for ny in -reach[1]..=reach[1] {
                        for nz in -reach[2]..=reach[2] {
                            if i == j && nx == 0 && ny == 0 && nz == 0 {
                                continue;
                            }
                            let shift = nalgebra::Vector3::new(
                                nx as f64 * cell.lengths.x,
                                ny as f64 * cell.lengths.y,
                                nz as f64 * cell.lengths.z,
                            );
                            let r2 = (rj + shift - ri).norm_squared();
                            if r2 > cutoff2 {
                                continue;
                            }
                            // every pair is visited from both ends
                            energy += 0.5 * self.pair_energy(r2.sqrt());
                        }
                    }
                }
            }
        }
        energy
    }

    fn write_log(&self, files: &SolverFiles, structure: &Structure, energy: f64) -> Result<(), SolverError> {
        let mut log = BufWriter::new(File::create(&files.log)?);
        writeln!(log, "Morse pair model")?;
        writeln!(
            log,
            "  D = {:.6} eV, a = {:.6} 1/Å, r0 = {:.6} Å, cutoff = {:.6} Å",
            self.well_depth, self.width, self.equilibrium_distance, self.cutoff
        )?;
        writeln!(
            log,
            "Cell (Å): {:.6} {:.6} {:.6}",
            structure.cell.a(),
            structure.cell.b(),
            structure.cell.c()
        )?;
        for (idx, (symbol, pos)) in structure.atoms().enumerate() {
            writeln!(
                log,
                "  Atom {:>2} {:>2}: [{:.6}, {:.6}, {:.6}]",
                idx + 1,
                symbol,
                pos.x,
                pos.y,
                pos.z
            )?;
        }
        writeln!(log, "Total energy: {:.10} eV", energy)?;
        log.flush()?;
        Ok(())
    }

    fn write_checkpoint(&self, files: &SolverFiles, structure: &Structure, energy: f64) -> Result<(), SolverError> {
        let Some(path) = &files.checkpoint else {
            return Ok(());
        };
        let checkpoint = MorseCheckpoint {
            formula: structure.formula(),
            symbols: structure.symbols(),
            positions: structure.positions.iter().map(|p| [p.x, p.y, p.z]).collect(),
            cell: structure.cell.matrix(),
            pbc: structure.cell.pbc,
            model: self,
            energy,
        };
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &checkpoint).map_err(|e| {
            SolverError::Checkpoint {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;
        writer.flush()?;
        Ok(())
    }
}

impl EnergySolver for MorseSolver {
    fn name(&self) -> &str {
        "morse"
    }

    fn potential_energy(
        &self,
        structure: &Structure,
        files: &SolverFiles,
    ) -> Result<f64, SolverError> {
        let energy = ensure_finite(self.total_energy(structure))?;
        debug!("Morse energy for {}: {:.10} eV", structure.formula(), energy);
        self.write_log(files, structure, energy)?;
        self.write_checkpoint(files, structure, energy)?;
        Ok(energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::UnitCell;
    use nalgebra::Vector3;
    use periodic_table_on_an_enum::Element;

    fn dimer(r: f64, pbc: bool) -> Structure {
        let mut cell = UnitCell::periodic(30.0, 30.0, 30.0);
        cell.pbc = [pbc; 3];
        Structure {
            elements: vec![Element::Carbon, Element::Iron],
            positions: vec![Vector3::new(5.0, 5.0, 5.0), Vector3::new(5.0 + r, 5.0, 5.0)],
            cell,
        }
    }

    #[test]
    fn test_pair_energy_minimum() {
        let solver = MorseSolver::new(1.0, 1.5, 2.0, 6.0);
        assert!((solver.pair_energy(2.0) + 1.0).abs() < 1e-12);
        assert!(solver.pair_energy(1.8) > solver.pair_energy(2.0));
        assert!(solver.pair_energy(2.2) > solver.pair_energy(2.0));
    }

    #[test]
    fn test_isolated_dimer_counts_pair_once() {
        let solver = MorseSolver::new(0.7, 1.2, 1.9, 6.0);
        for pbc in [false, true] {
            let energy = solver.total_energy(&dimer(1.9, pbc));
            assert!((energy + 0.7).abs() < 1e-12, "pbc={} energy={}", pbc, energy);
        }
    }

    #[test]
    fn test_periodic_images_contribute() {
        let solver = MorseSolver::new(1.0, 1.5, 2.0, 6.0);
        let mut structure = dimer(2.0, true);
        structure.cell = UnitCell::periodic(4.0, 30.0, 30.0);
        let isolated = solver.total_energy(&dimer(2.0, false));
        let periodic = solver.total_energy(&structure);
        assert!(periodic < isolated);
    }

    #[test]
    fn test_writes_log_and_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let files = SolverFiles {
            log: dir.path().join("chain_lin_2.00.txt"),
            checkpoint: Some(dir.path().join("structure_2.00.gpw")),
        };
        let solver = MorseSolver::from_params(&MorseParams::default());
        let energy = solver.potential_energy(&dimer(2.0, false), &files).unwrap();

        let log = std::fs::read_to_string(&files.log).unwrap();
        assert!(log.contains(&format!("Total energy: {:.10} eV", energy)));

        let checkpoint: serde_json::Value =
            serde_json::from_reader(File::open(files.checkpoint.unwrap()).unwrap()).unwrap();
        assert_eq!(checkpoint["formula"], "CFe");
        assert_eq!(checkpoint["energy"].as_f64(), Some(energy));
    }
}
