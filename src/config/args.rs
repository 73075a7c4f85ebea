//! Command-line argument parsing for bond-length scans

use clap::Parser;

/// Lattice-spacing energy scan of a two-atom periodic cell
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to an optional YAML configuration file
    #[arg(short, long)]
    pub config_file: Option<String>,

    /// Override output file for the log: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Also log debug messages, including solver stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory receiving the per-point artifacts and the plot
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Energy solver backend
    #[arg(long, value_parser = ["gpaw", "morse"])]
    pub solver: Option<String>,

    /// Override the python interpreter used by the gpaw backend
    #[arg(long)]
    pub python: Option<String>,

    /// Override the first lattice parameter (Å)
    #[arg(long)]
    pub start: Option<f64>,

    /// Override the last lattice parameter (Å)
    #[arg(long)]
    pub stop: Option<f64>,

    /// Override the number of lattice parameters
    #[arg(long)]
    pub samples: Option<usize>,

    /// Evaluate all sweep points concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Open the energy curve in the configured image viewer
    #[arg(long)]
    pub show_plot: bool,

    /// Open the final structure in the configured structure viewer
    #[arg(long)]
    pub view: bool,
}
