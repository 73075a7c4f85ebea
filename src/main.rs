//! Bond-length scan command-line interface
//!
//! Sweeps the lattice spacing of a two-atom periodic cell, evaluates the
//! total energy at every point and reports the equilibrium bond length.

use bond_scan::app::BondScanApplication;
use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    BondScanApplication::from_cli()?.run()
}
