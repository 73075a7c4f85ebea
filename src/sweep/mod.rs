//! Lattice-parameter sweep and energy-curve analysis
//!
//! Every sweep point is evaluated by [`SweepRunner::evaluate_point`], which
//! builds a fresh structure, asks the solver for its energy and writes the
//! point's artifacts. Nothing is shared between points, so the sweep can run
//! sequentially or be fanned out over a rayon pool; either way the energies
//! come back in parameter order.

use crate::config::SweepParams;
use crate::io::{format_parameter, write_report, write_xyz, ArtifactLayout, PointArtifacts};
use crate::solver::EnergySolver;
use crate::structure::PairCellBuilder;
use color_eyre::eyre::{ensure, Result, WrapErr};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::info;

/// Evenly spaced lattice parameters over a closed interval
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeSweep {
    pub start: f64,
    pub stop: f64,
    pub samples: usize,
}

impl LatticeSweep {
    pub fn new(start: f64, stop: f64, samples: usize) -> Result<Self> {
        ensure!(
            start.is_finite() && stop.is_finite(),
            "Sweep bounds must be finite, got [{}, {}]",
            start,
            stop
        );
        ensure!(start > 0.0, "Lattice parameters must be positive, got start={}", start);
        ensure!(
            start < stop,
            "Sweep start ({}) must be smaller than stop ({})",
            start,
            stop
        );
        ensure!(samples >= 2, "A sweep needs at least 2 samples, got {}", samples);
        let sweep = LatticeSweep {
            start,
            stop,
            samples,
        };

        // artifacts are keyed by the two-decimal tag, so tags must not collide
        let mut tags = HashSet::with_capacity(samples);
        for l in sweep.parameters() {
            let tag = format_parameter(l);
            ensure!(
                tags.insert(tag.clone()),
                "{} samples over [{}, {}] Å map several points to the file tag {}; use a coarser grid",
                samples,
                start,
                stop,
                tag
            );
        }
        Ok(sweep)
    }

    pub fn from_params(params: &SweepParams) -> Result<Self> {
        let defaults = SweepParams::default();
        LatticeSweep::new(
            params.start.or(defaults.start).unwrap_or(1.5),
            params.stop.or(defaults.stop).unwrap_or(2.5),
            params.samples.or(defaults.samples).unwrap_or(10),
        )
    }

    pub fn step(&self) -> f64 {
        (self.stop - self.start) / (self.samples - 1) as f64
    }

    /// Sample points, both endpoints included; the last one is exactly `stop`.
    pub fn parameters(&self) -> Vec<f64> {
        let step = self.step();
        let mut values: Vec<f64> = (0..self.samples)
            .map(|i| self.start + i as f64 * step)
            .collect();
        if let Some(last) = values.last_mut() {
            *last = self.stop;
        }
        values
    }
}

/// Lowest point of an energy curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveMinimum {
    pub index: usize,
    pub lattice_parameter: f64,
    pub bond_length: f64,
    pub energy: f64,
}

/// Energies in the order of the lattice parameters that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyCurve {
    lattice_parameters: Vec<f64>,
    energies: Vec<f64>,
}

impl EnergyCurve {
    pub fn new(lattice_parameters: Vec<f64>, energies: Vec<f64>) -> Result<Self> {
        ensure!(
            lattice_parameters.len() == energies.len(),
            "Got {} energies for {} lattice parameters",
            energies.len(),
            lattice_parameters.len()
        );
        ensure!(
            energies.iter().all(|e| e.is_finite()),
            "Energy curve contains non-finite values"
        );
        Ok(EnergyCurve {
            lattice_parameters,
            energies,
        })
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    pub fn lattice_parameters(&self) -> &[f64] {
        &self.lattice_parameters
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Bond length of each point, half its lattice parameter.
    pub fn bond_lengths(&self) -> Vec<f64> {
        self.lattice_parameters.iter().map(|l| l / 2.0).collect()
    }

    /// First point holding the lowest energy.
    pub fn minimum(&self) -> Option<CurveMinimum> {
        let mut best: Option<usize> = None;
        for (i, &e) in self.energies.iter().enumerate() {
            match best {
                Some(b) if self.energies[b] <= e => {}
                _ => best = Some(i),
            }
        }
        best.map(|index| {
            let lattice_parameter = self.lattice_parameters[index];
            CurveMinimum {
                index,
                lattice_parameter,
                bond_length: lattice_parameter / 2.0,
                energy: self.energies[index],
            }
        })
    }
}

/// Outcome of one sweep point
#[derive(Debug, Clone)]
pub struct SweepPoint {
    pub lattice_parameter: f64,
    pub energy: f64,
    pub artifacts: PointArtifacts,
}

/// Drives an energy solver across a lattice sweep
pub struct SweepRunner<'a> {
    solver: &'a dyn EnergySolver,
    builder: &'a PairCellBuilder,
    layout: &'a ArtifactLayout,
    parallel: bool,
}

impl<'a> SweepRunner<'a> {
    pub fn new(
        solver: &'a dyn EnergySolver,
        builder: &'a PairCellBuilder,
        layout: &'a ArtifactLayout,
    ) -> Self {
        SweepRunner {
            solver,
            builder,
            layout,
            parallel: false,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Evaluate one lattice parameter and persist its artifacts.
    pub fn evaluate_point(&self, l: f64) -> Result<SweepPoint> {
        let structure = self.builder.build(l);
        let artifacts = self.layout.for_parameter(l);

        let energy = self
            .solver
            .potential_energy(&structure, &artifacts.solver_files())
            .wrap_err_with(|| {
                format!("{} solver failed for l={:.2} Å", self.solver.name(), l)
            })?;
        info!("Step: l={:.2} Å → E={:.6} eV", l, energy);

        write_xyz(&artifacts.xyz, &structure, Some(energy))?;
        write_report(&artifacts.report, &structure)?;

        Ok(SweepPoint {
            lattice_parameter: l,
            energy,
            artifacts,
        })
    }

    /// Evaluate every point of the sweep; the first failure aborts the scan.
    pub fn run(&self, sweep: &LatticeSweep) -> Result<EnergyCurve> {
        let parameters = sweep.parameters();
        info!(
            "Sweeping {} lattice parameters in [{:.3}, {:.3}] Å with the {} solver{}",
            parameters.len(),
            sweep.start,
            sweep.stop,
            self.solver.name(),
            if self.parallel { " (parallel)" } else { "" }
        );

        let points: Vec<SweepPoint> = if self.parallel {
            parameters
                .par_iter()
                .map(|&l| self.evaluate_point(l))
                .collect::<Result<Vec<_>>>()?
        } else {
            parameters
                .iter()
                .map(|&l| self.evaluate_point(l))
                .collect::<Result<Vec<_>>>()?
        };

        let energies = points.iter().map(|p| p.energy).collect();
        EnergyCurve::new(parameters, energies)
    }
}
