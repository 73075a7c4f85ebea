use crate::sweep::{CurveMinimum, EnergyCurve};
use tracing::info;

pub fn report_minimum(curve: &EnergyCurve, minimum: &CurveMinimum) {
    info!("Scan finished: {} points", curve.len());
    for (i, (bond, energy)) in curve
        .bond_lengths()
        .iter()
        .zip(curve.energies())
        .enumerate()
    {
        let marker = if i == minimum.index { "  <- minimum" } else { "" };
        info!("  {:>2}  r = {:.4} Å  E = {:.6} eV{}", i + 1, bond, energy, marker);
    }
    info!(
        "Minimum energy bond length (Å): {} (l = {:.4} Å, E = {:.6} eV)",
        minimum.bond_length, minimum.lattice_parameter, minimum.energy
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::capture_logs;

    #[test]
    fn test_minimum_line_format() {
        let curve = EnergyCurve::new(vec![2.0, 2.2, 2.4], vec![-1.0, -1.5, -1.2]).unwrap();
        let minimum = curve.minimum().unwrap();
        let logs = capture_logs(|| report_minimum(&curve, &minimum));

        let lines: Vec<&str> = logs.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].ends_with("<- minimum"));
        assert!(lines[4]
            .ends_with("Minimum energy bond length (Å): 1.1 (l = 2.2000 Å, E = -1.500000 eV)"));
    }
}
