//! Configuration management for bond-length scans
//!
//! Every field is optional. Missing values fall back to the built-in scan of
//! a C–Fe pair over ten lattice parameters in [1.5, 2.5] Å, evaluated with
//! GPAW in LCAO mode.

mod args;

pub use args::Args;

use crate::solver::morse::MorseParams;
use crate::solver::SolverSettings;
use serde::{Deserialize, Serialize};

/// Main configuration structure for a scan
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub sweep: SweepParams,
    #[serde(default)]
    pub cell: CellParams,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub output: OutputParams,
    #[serde(default)]
    pub viewer: ViewerParams,
}

/// Lattice parameter grid
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SweepParams {
    pub start: Option<f64>,
    pub stop: Option<f64>,
    pub samples: Option<usize>,
    pub parallel: Option<bool>,
}

impl Default for SweepParams {
    fn default() -> Self {
        SweepParams {
            start: Some(1.5),
            stop: Some(2.5),
            samples: Some(10),
            parallel: Some(false),
        }
    }
}

impl SweepParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.start.is_none() {
            self.start = defaults.start;
        }
        if self.stop.is_none() {
            self.stop = defaults.stop;
        }
        if self.samples.is_none() {
            self.samples = defaults.samples;
        }
        if self.parallel.is_none() {
            self.parallel = defaults.parallel;
        }
        self
    }
}

/// Geometry of the scanned two-atom cell
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CellParams {
    /// Element symbols of the two atoms, in placement order
    pub species: Option<Vec<String>>,
    /// Ratio b / a of the in-plane cell lengths
    pub aspect_ratio: Option<f64>,
    /// Cell length along z (Å)
    pub height: Option<f64>,
    /// z coordinate of both atoms (Å)
    pub plane_z: Option<f64>,
}

impl Default for CellParams {
    fn default() -> Self {
        CellParams {
            species: Some(vec!["C".to_string(), "Fe".to_string()]),
            aspect_ratio: Some(1.732),
            height: Some(20.0),
            plane_z: Some(10.0),
        }
    }
}

impl CellParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.species.is_none() {
            self.species = defaults.species;
        }
        if self.aspect_ratio.is_none() {
            self.aspect_ratio = defaults.aspect_ratio;
        }
        if self.height.is_none() {
            self.height = defaults.height;
        }
        if self.plane_z.is_none() {
            self.plane_z = defaults.plane_z;
        }
        self
    }

    pub fn species(&self) -> Vec<String> {
        self.species
            .clone()
            .unwrap_or_else(|| vec!["C".to_string(), "Fe".to_string()])
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio.unwrap_or(1.732)
    }

    pub fn height(&self) -> f64 {
        self.height.unwrap_or(20.0)
    }

    pub fn plane_z(&self) -> f64 {
        self.plane_z.unwrap_or(10.0)
    }
}

/// Energy solver selection
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SolverConfig {
    /// GPAW through ASE, run in a python subprocess
    Gpaw(GpawParams),
    /// Periodic Morse pair model, evaluated in-process
    Morse(MorseParams),
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig::Gpaw(GpawParams::default())
    }
}

impl SolverConfig {
    /// Apply defaults to the selected backend
    pub fn with_defaults(self) -> Self {
        match self {
            SolverConfig::Gpaw(params) => SolverConfig::Gpaw(params.with_defaults()),
            SolverConfig::Morse(params) => SolverConfig::Morse(params.with_defaults()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SolverConfig::Gpaw(_) => "gpaw",
            SolverConfig::Morse(_) => "morse",
        }
    }
}

/// GPAW calculator parameters
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GpawParams {
    pub python: Option<String>,
    pub mode: Option<String>,
    pub basis: Option<String>,
    pub xc: Option<String>,
    pub kpts: Option<[usize; 3]>,
    pub smearing_width: Option<f64>,
    pub energy_convergence: Option<f64>,
}

impl GpawParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = SolverSettings::default();
        if self.python.is_none() {
            self.python = Some("python3".to_string());
        }
        if self.mode.is_none() {
            self.mode = Some(defaults.mode);
        }
        if self.basis.is_none() {
            self.basis = Some(defaults.basis);
        }
        if self.xc.is_none() {
            self.xc = Some(defaults.xc);
        }
        if self.kpts.is_none() {
            self.kpts = Some(defaults.kpts);
        }
        if self.smearing_width.is_none() {
            self.smearing_width = Some(defaults.smearing_width);
        }
        if self.energy_convergence.is_none() {
            self.energy_convergence = Some(defaults.energy_convergence);
        }
        self
    }

    pub fn python(&self) -> String {
        self.python.clone().unwrap_or_else(|| "python3".to_string())
    }

    /// Numerical settings handed to the calculator
    pub fn settings(&self) -> SolverSettings {
        let defaults = SolverSettings::default();
        SolverSettings {
            mode: self.mode.clone().unwrap_or(defaults.mode),
            basis: self.basis.clone().unwrap_or(defaults.basis),
            xc: self.xc.clone().unwrap_or(defaults.xc),
            kpts: self.kpts.unwrap_or(defaults.kpts),
            smearing_width: self.smearing_width.unwrap_or(defaults.smearing_width),
            energy_convergence: self
                .energy_convergence
                .unwrap_or(defaults.energy_convergence),
        }
    }
}

/// Artifact locations
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputParams {
    pub directory: Option<String>,
    pub plot_file: Option<String>,
    pub curve_file: Option<String>,
    pub log_prefix: Option<String>,
    pub structure_prefix: Option<String>,
}

impl Default for OutputParams {
    fn default() -> Self {
        OutputParams {
            directory: Some(".".to_string()),
            plot_file: Some("bond_energy_curve.png".to_string()),
            curve_file: Some("bond_energy_curve.dat".to_string()),
            log_prefix: Some("chain_lin".to_string()),
            structure_prefix: Some("structure".to_string()),
        }
    }
}

impl OutputParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.directory.is_none() {
            self.directory = defaults.directory;
        }
        if self.plot_file.is_none() {
            self.plot_file = defaults.plot_file;
        }
        if self.curve_file.is_none() {
            self.curve_file = defaults.curve_file;
        }
        if self.log_prefix.is_none() {
            self.log_prefix = defaults.log_prefix;
        }
        if self.structure_prefix.is_none() {
            self.structure_prefix = defaults.structure_prefix;
        }
        self
    }
}

/// Which structure is handed to the structure viewer
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewTarget {
    /// Structure of the last swept lattice parameter
    #[default]
    Last,
    /// Structure of the energy-minimising lattice parameter
    Minimum,
}

/// Interactive viewers launched after the scan
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ViewerParams {
    pub show_plot: Option<bool>,
    pub view_structure: Option<bool>,
    pub plot_command: Option<String>,
    pub structure_command: Option<String>,
    pub target: Option<ViewTarget>,
}

impl Default for ViewerParams {
    fn default() -> Self {
        ViewerParams {
            show_plot: Some(false),
            view_structure: Some(false),
            plot_command: Some("xdg-open".to_string()),
            structure_command: Some("ase gui".to_string()),
            target: Some(ViewTarget::Last),
        }
    }
}

impl ViewerParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.show_plot.is_none() {
            self.show_plot = defaults.show_plot;
        }
        if self.view_structure.is_none() {
            self.view_structure = defaults.view_structure;
        }
        if self.plot_command.is_none() {
            self.plot_command = defaults.plot_command;
        }
        if self.structure_command.is_none() {
            self.structure_command = defaults.structure_command;
        }
        if self.target.is_none() {
            self.target = defaults.target;
        }
        self
    }
}

impl Config {
    /// Apply defaults to all configuration sections
    pub fn with_defaults(mut self) -> Self {
        self.sweep = self.sweep.with_defaults();
        self.cell = self.cell.with_defaults();
        self.solver = self.solver.with_defaults();
        self.output = self.output.with_defaults();
        self.viewer = self.viewer.with_defaults();
        self
    }

    /// Fold command-line overrides into the configuration
    pub fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(start) = args.start {
            self.sweep.start = Some(start);
        }
        if let Some(stop) = args.stop {
            self.sweep.stop = Some(stop);
        }
        if let Some(samples) = args.samples {
            self.sweep.samples = Some(samples);
        }
        if args.parallel {
            self.sweep.parallel = Some(true);
        }
        if let Some(dir) = &args.output_dir {
            self.output.directory = Some(dir.clone());
        }
        if args.show_plot {
            self.viewer.show_plot = Some(true);
        }
        if args.view {
            self.viewer.view_structure = Some(true);
        }
        if let Some(kind) = &args.solver {
            if kind.to_lowercase() != self.solver.kind() {
                self.solver = match kind.to_lowercase().as_str() {
                    "morse" => SolverConfig::Morse(MorseParams::default()),
                    _ => SolverConfig::Gpaw(GpawParams::default()),
                }
                .with_defaults();
            }
        }
        if let (Some(python), SolverConfig::Gpaw(params)) = (&args.python, &mut self.solver) {
            params.python = Some(python.clone());
        }
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.sweep.parallel.unwrap_or(false)
    }

    pub fn output_dir(&self) -> String {
        self.output
            .directory
            .clone()
            .unwrap_or_else(|| ".".to_string())
    }

    pub fn plot_file(&self) -> String {
        self.output
            .plot_file
            .clone()
            .unwrap_or_else(|| "bond_energy_curve.png".to_string())
    }

    pub fn curve_file(&self) -> String {
        self.output
            .curve_file
            .clone()
            .unwrap_or_else(|| "bond_energy_curve.dat".to_string())
    }

    pub fn show_plot(&self) -> bool {
        self.viewer.show_plot.unwrap_or(false)
    }

    pub fn view_structure(&self) -> bool {
        self.viewer.view_structure.unwrap_or(false)
    }

    pub fn view_target(&self) -> ViewTarget {
        self.viewer.target.unwrap_or_default()
    }
}
