//! GPAW backend
//!
//! Each evaluation runs a fresh python interpreter with a small ASE/GPAW
//! driver. The request (structure, settings, file paths) goes in as JSON on
//! stdin; the driver prints `{"energy": <eV>}` as its last stdout line.

use super::{ensure_finite, EnergySolver, SolverError, SolverFiles, SolverSettings};
use crate::structure::Structure;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

const DRIVER: &str = r#"
import json
import sys

from ase import Atoms
from gpaw import GPAW, FermiDirac

request = json.loads(sys.stdin.read())
settings = request["settings"]

atoms = Atoms(
    "".join(request["symbols"]),
    positions=request["positions"],
    cell=request["cell"],
    pbc=request["pbc"],
)
atoms.calc = GPAW(
    mode=settings["mode"],
    basis=settings["basis"],
    xc=settings["xc"],
    kpts=tuple(settings["kpts"]),
    occupations=FermiDirac(settings["smearing_width"]),
    convergence={"energy": settings["energy_convergence"]},
    txt=request["log"],
)

energy = atoms.get_potential_energy()
if request.get("checkpoint"):
    atoms.calc.write(request["checkpoint"], mode="all")

sys.stdout.write("\n" + json.dumps({"energy": float(energy)}) + "\n")
"#;

#[derive(Serialize)]
struct GpawRequest<'a> {
    symbols: Vec<&'static str>,
    positions: Vec<[f64; 3]>,
    cell: [[f64; 3]; 3],
    pbc: [bool; 3],
    settings: &'a SolverSettings,
    log: String,
    checkpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GpawReply {
    energy: f64,
}

#[derive(Debug, Clone)]
pub struct GpawSolver {
    pub python: String,
    pub settings: SolverSettings,
}

impl GpawSolver {
    pub fn new(python: impl Into<String>, settings: SolverSettings) -> Self {
        GpawSolver {
            python: python.into(),
            settings,
        }
    }

    fn request_json(&self, structure: &Structure, files: &SolverFiles) -> Result<String, SolverError> {
        let request = GpawRequest {
            symbols: structure.symbols(),
            positions: structure.positions.iter().map(|p| [p.x, p.y, p.z]).collect(),
            cell: structure.cell.matrix(),
            pbc: structure.cell.pbc,
            settings: &self.settings,
            log: path_string(&files.log),
            checkpoint: files.checkpoint.as_deref().map(path_string),
        };
        Ok(serde_json::to_string(&request).map_err(std::io::Error::from)?)
    }
}

impl EnergySolver for GpawSolver {
    fn name(&self) -> &str {
        "gpaw"
    }

    fn potential_energy(
        &self,
        structure: &Structure,
        files: &SolverFiles,
    ) -> Result<f64, SolverError> {
        let request = self.request_json(structure, files)?;

        let mut command = Command::new(&self.python);
        command
            .arg("-c")
            .arg(DRIVER)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!("$ {} -c <gpaw driver>", self.python);

        let mut child = command.spawn().map_err(|source| SolverError::Spawn {
            program: self.python.clone(),
            source,
        })?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(request.as_bytes())?;
        }
        let output = child.wait_with_output()?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            debug!("[{}] {}", self.python, line);
        }
        if !output.status.success() {
            return Err(SolverError::Failed {
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }

        let energy = parse_reply(&String::from_utf8_lossy(&output.stdout))?;
        info!("GPAW log written to {}", files.log.display());
        ensure_finite(energy)
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Extract the energy from the last non-empty line of the driver's stdout.
fn parse_reply(stdout: &str) -> Result<f64, SolverError> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| SolverError::MalformedReply("empty output".to_string()))?;
    let reply: GpawReply = serde_json::from_str(line.trim())
        .map_err(|e| SolverError::MalformedReply(format!("{e}: {line}")))?;
    Ok(reply.energy)
}
