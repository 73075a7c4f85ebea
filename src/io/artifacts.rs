//! Per-point artifacts and the tabulated energy curve

use crate::solver::SolverFiles;
use crate::structure::Structure;
use crate::sweep::EnergyCurve;
use color_eyre::eyre::{Result, WrapErr};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Lattice parameter as it appears in file names, e.g. `2.17`.
pub fn format_parameter(l: f64) -> String {
    format!("{:.2}", l)
}

/// Where the artifacts of a scan live and how they are named
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    pub directory: PathBuf,
    pub log_prefix: String,
    pub structure_prefix: String,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        ArtifactLayout {
            directory: PathBuf::from("."),
            log_prefix: "chain_lin".to_string(),
            structure_prefix: "structure".to_string(),
        }
    }
}

/// Files written for a single lattice parameter
#[derive(Debug, Clone, PartialEq)]
pub struct PointArtifacts {
    pub solver_log: PathBuf,
    pub xyz: PathBuf,
    pub report: PathBuf,
    pub checkpoint: PathBuf,
}

impl PointArtifacts {
    pub fn solver_files(&self) -> SolverFiles {
        SolverFiles {
            log: self.solver_log.clone(),
            checkpoint: Some(self.checkpoint.clone()),
        }
    }
}

impl ArtifactLayout {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        ArtifactLayout {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn for_parameter(&self, l: f64) -> PointArtifacts {
        let tag = format_parameter(l);
        let structure = |ext: &str| {
            self.directory
                .join(format!("{}_{}.{}", self.structure_prefix, tag, ext))
        };
        PointArtifacts {
            solver_log: self
                .directory
                .join(format!("{}_{}.txt", self.log_prefix, tag)),
            xyz: structure("xyz"),
            report: structure("txt"),
            checkpoint: structure("gpw"),
        }
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }

    pub fn create_directory(&self) -> Result<()> {
        fs::create_dir_all(&self.directory).wrap_err_with(|| {
            format!(
                "Unable to create output directory: {}",
                self.directory.display()
            )
        })
    }
}

/// Write an extended XYZ file with cell, periodicity and (optionally) energy.
pub fn write_xyz(path: &Path, structure: &Structure, energy: Option<f64>) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Unable to create XYZ file: {}", path.display()))?;
    let mut w = BufWriter::new(file);

    let cell = structure.cell.matrix();
    let lattice = cell
        .iter()
        .flat_map(|row| row.iter())
        .map(|v| format!("{:.8}", v))
        .collect::<Vec<_>>()
        .join(" ");
    let pbc = structure
        .cell
        .pbc
        .iter()
        .map(|&p| if p { "T" } else { "F" })
        .collect::<Vec<_>>()
        .join(" ");

    writeln!(w, "{}", structure.len())?;
    write!(
        w,
        "Lattice=\"{}\" Properties=species:S:1:pos:R:3",
        lattice
    )?;
    if let Some(energy) = energy {
        write!(w, " energy={:.8}", energy)?;
    }
    writeln!(w, " pbc=\"{}\"", pbc)?;
    for (symbol, pos) in structure.atoms() {
        writeln!(
            w,
            "{:<2} {:>16.8} {:>16.8} {:>16.8}",
            symbol, pos.x, pos.y, pos.z
        )?;
    }
    w.flush()?;
    Ok(())
}

/// Write the human-readable cell and coordinate report.
pub fn write_report(path: &Path, structure: &Structure) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Unable to create structure report: {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(
        w,
        "Lattice parameters (Å): a={:.6}, b={:.6}, c={:.6}",
        structure.cell.a(),
        structure.cell.b(),
        structure.cell.c()
    )?;
    writeln!(w, "Atomic positions (Å):")?;
    for (i, (symbol, pos)) in structure.atoms().enumerate() {
        writeln!(
            w,
            "{:>2}  {:<2}  {:>10.6}  {:>10.6}  {:>10.6}",
            i + 1,
            symbol,
            pos.x,
            pos.y,
            pos.z
        )?;
    }
    w.flush()?;
    Ok(())
}

/// Write the energy curve as a two-column table.
pub fn write_curve(path: &Path, curve: &EnergyCurve) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Unable to create curve file: {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# bond_length(Å)  energy(eV)")?;
    for (bond, energy) in curve.bond_lengths().iter().zip(curve.energies()) {
        writeln!(w, "{:>14.8}  {:>16.8}", bond, energy)?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CellParams;
    use crate::structure::PairCellBuilder;

    fn builder() -> PairCellBuilder {
        PairCellBuilder::from_params(&CellParams::default()).unwrap()
    }

    #[test]
    fn test_artifact_names() {
        let layout = ArtifactLayout::default();
        let files = layout.for_parameter(2.0);

        assert_eq!(files.solver_log, Path::new("./chain_lin_2.00.txt"));
        assert_eq!(files.xyz, Path::new("./structure_2.00.xyz"));
        assert_eq!(files.report, Path::new("./structure_2.00.txt"));
        assert_eq!(files.checkpoint, Path::new("./structure_2.00.gpw"));
    }

    #[test]
    fn test_format_parameter_rounds_to_two_decimals() {
        assert_eq!(format_parameter(2.0), "2.00");
        assert_eq!(format_parameter(1.5 + 6.0 / 9.0), "2.17");
        assert_eq!(format_parameter(1.5 + 4.0 / 9.0), "1.94");
    }

    #[test]
    fn test_report_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("structure_2.00.txt");
        write_report(&path, &builder().build(2.0)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let expected = "Lattice parameters (Å): a=2.000000, b=3.464000, c=20.000000\n\
                        Atomic positions (Å):\n \
                        1  C     0.000000    0.000000   10.000000\n \
                        2  Fe    1.000000    1.732000   10.000000\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_report_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.txt");
        let structure = builder().build(1.5 + 2.0 / 9.0);
        write_report(&first, &structure).unwrap();
        write_report(&second, &builder().build(1.5 + 2.0 / 9.0)).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_xyz_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("structure_2.00.xyz");
        write_xyz(&path, &builder().build(2.0), Some(-1.25)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "2");
        assert!(lines[1].starts_with("Lattice=\"2.00000000 0.00000000 0.00000000 0.00000000 3.46400000"));
        assert!(lines[1].contains("energy=-1.25000000"));
        assert!(lines[1].ends_with("pbc=\"T T T\""));
        assert!(lines[2].starts_with("C "));
        assert!(lines[3].starts_with("Fe"));
        assert!(lines[3].ends_with("10.00000000"));
    }

    #[test]
    fn test_curve_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.dat");
        let curve = EnergyCurve::new(vec![2.0, 2.2], vec![-1.0, -1.5]).unwrap();
        write_curve(&path, &curve).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].trim_start().starts_with("1.10000000"));
        assert!(rows[1].trim_end().ends_with("-1.50000000"));
    }
}
