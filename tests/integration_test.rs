//! End-to-end scans with the in-process Morse solver

use bond_scan::app::BondScanApplication;
use bond_scan::config::{Args, Config};
use std::fs;
use std::path::{Path, PathBuf};

fn morse_config(dir: &Path, extra: &str) -> Config {
    let yaml = format!(
        r#"
solver:
  kind: morse
  well_depth: 1.0
  width: 1.5
  equilibrium_distance: 2.0
output:
  directory: "{}"
{}
"#,
        dir.display(),
        extra
    );
    serde_yml::from_str::<Config>(&yaml).unwrap().with_defaults()
}

fn example_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("example")
        .join(filename)
}

#[test]
fn test_full_scan_writes_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let app = BondScanApplication::new(Args::default(), morse_config(dir.path(), ""));
    let summary = app.scan().unwrap();

    assert_eq!(summary.curve.len(), 10);
    for l in summary.curve.lattice_parameters() {
        let tag = format!("{:.2}", l);
        for name in [
            format!("chain_lin_{tag}.txt"),
            format!("structure_{tag}.xyz"),
            format!("structure_{tag}.txt"),
            format!("structure_{tag}.gpw"),
        ] {
            assert!(dir.path().join(&name).exists(), "missing {}", name);
        }
    }
    assert!(summary.plot.exists());
    assert!(summary.curve_table.exists());
    assert_eq!(summary.plot, dir.path().join("bond_energy_curve.png"));

    let minimum = summary.curve.minimum().unwrap();
    assert_eq!(
        summary.bond_length,
        summary.curve.lattice_parameters()[minimum.index] / 2.0
    );
    assert!((0.75..=1.25).contains(&summary.bond_length));
}

#[test]
fn test_rerun_reproduces_text_reports() {
    let dir = tempfile::tempdir().unwrap();
    let app = BondScanApplication::new(Args::default(), morse_config(dir.path(), ""));

    let first = app.scan().unwrap();
    let reports: Vec<Vec<u8>> = first
        .curve
        .lattice_parameters()
        .iter()
        .map(|l| fs::read(dir.path().join(format!("structure_{:.2}.txt", l))).unwrap())
        .collect();

    let second = app.scan().unwrap();
    assert_eq!(first.curve, second.curve);
    for (l, before) in second.curve.lattice_parameters().iter().zip(reports) {
        let after = fs::read(dir.path().join(format!("structure_{:.2}.txt", l))).unwrap();
        assert_eq!(before, after);
    }
}

#[test]
fn test_parallel_scan_matches_sequential() {
    let seq_dir = tempfile::tempdir().unwrap();
    let par_dir = tempfile::tempdir().unwrap();

    let sequential = BondScanApplication::new(Args::default(), morse_config(seq_dir.path(), ""))
        .scan()
        .unwrap();
    let parallel = BondScanApplication::new(
        Args::default(),
        morse_config(par_dir.path(), "sweep:\n  parallel: true"),
    )
    .scan()
    .unwrap();

    assert_eq!(sequential.curve, parallel.curve);
    assert_eq!(sequential.bond_length, parallel.bond_length);
}

#[test]
fn test_custom_grid_and_prefixes() {
    let dir = tempfile::tempdir().unwrap();
    let extra = "sweep:\n  start: 1.8\n  stop: 2.4\n  samples: 4";
    let mut config = morse_config(dir.path(), extra);
    config.output.log_prefix = Some("scan_log".to_string());

    let summary = BondScanApplication::new(Args::default(), config).scan().unwrap();
    assert_eq!(summary.curve.len(), 4);
    assert!(dir.path().join("scan_log_1.80.txt").exists());
    assert!(dir.path().join("structure_2.40.xyz").exists());
}

#[test]
fn test_invalid_species_aborts_before_solving() {
    let dir = tempfile::tempdir().unwrap();
    let config = morse_config(dir.path(), "cell:\n  species: [C, Qq]");
    let result = BondScanApplication::new(Args::default(), config).scan();

    assert!(result.is_err());
    assert!(!dir.path().join("chain_lin_1.50.txt").exists());
}

#[test]
fn test_example_configs_parse() {
    for name in ["c_fe_chain.yaml", "morse_dry_run.yaml"] {
        let path = example_path(name);
        let text = fs::read_to_string(&path).unwrap();
        let config = serde_yml::from_str::<Config>(&text).unwrap().with_defaults();
        assert_eq!(config.cell.species().len(), 2, "{}", name);
    }
}
