mod report;
mod runner;
mod viewer;

pub use report::report_minimum;
pub use runner::build_solver;
pub use viewer::{launch_viewer, split_command};

use crate::config::{Args, Config, ViewTarget};
use crate::io::{plot_energy_curve, setup_output, write_curve, ArtifactLayout, PlotStyle};
use crate::structure::PairCellBuilder;
use crate::sweep::{EnergyCurve, LatticeSweep, SweepRunner};
use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub struct BondScanApplication {
    args: Args,
    config: Config,
}

/// Files produced by a completed scan
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub curve: EnergyCurve,
    pub bond_length: f64,
    pub plot: PathBuf,
    pub curve_table: PathBuf,
}

impl BondScanApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn new(args: Args, config: Config) -> Self {
        Self { args, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref(), self.args.verbose);
        self.scan().map(|_| ())
    }

    /// Run the sweep, write the summary artifacts and launch any viewers.
    pub fn scan(&self) -> Result<ScanSummary> {
        let config = &self.config;
        let sweep = LatticeSweep::from_params(&config.sweep)?;
        let builder = PairCellBuilder::from_params(&config.cell)?;
        let layout = artifact_layout(config);
        layout.create_directory()?;

        let solver = build_solver(&config.solver)?;
        let curve = SweepRunner::new(solver.as_ref(), &builder, &layout)
            .parallel(config.is_parallel())
            .run(&sweep)?;

        let minimum = curve
            .minimum()
            .ok_or_else(|| eyre!("The sweep produced no energies"))?;
        report_minimum(&curve, &minimum);

        let curve_table = layout.path(&config.curve_file());
        write_curve(&curve_table, &curve)?;

        let plot = layout.path(&config.plot_file());
        let style = PlotStyle::new(format!("{} Bond Energy Curve", builder.pair_label()));
        plot_energy_curve(&plot, &curve, &style)?;

        if config.show_plot() {
            if let Some(command) = &config.viewer.plot_command {
                launch_viewer(command, &plot)?;
            }
        }

        if config.view_structure() {
            let l = match config.view_target() {
                ViewTarget::Last => *curve
                    .lattice_parameters()
                    .last()
                    .ok_or_else(|| eyre!("The sweep produced no structures"))?,
                ViewTarget::Minimum => minimum.lattice_parameter,
            };
            info!("Viewing structure for l={:.2} Å", l);
            if let Some(command) = &config.viewer.structure_command {
                launch_viewer(command, &layout.for_parameter(l).xyz)?;
            }
        }

        Ok(ScanSummary {
            bond_length: minimum.bond_length,
            curve,
            plot,
            curve_table,
        })
    }
}

fn artifact_layout(config: &Config) -> ArtifactLayout {
    let mut layout = ArtifactLayout::new(config.output_dir());
    if let Some(prefix) = &config.output.log_prefix {
        layout.log_prefix = prefix.clone();
    }
    if let Some(prefix) = &config.output.structure_prefix {
        layout.structure_prefix = prefix.clone();
    }
    layout
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config_file {
        Some(path) => {
            let config_content = fs::read_to_string(path)
                .wrap_err_with(|| format!("Unable to read configuration file: {}", path))?;
            serde_yml::from_str::<Config>(&config_content)
                .wrap_err("Failed to parse configuration file")?
        }
        None => Config::default(),
    };

    Ok(config.with_defaults().with_overrides(args))
}
