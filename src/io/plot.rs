//! Energy curve rendering

use crate::sweep::EnergyCurve;
use color_eyre::eyre::{eyre, Result};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Register the first usable system font as `sans-serif`, once per process.
fn font_available() -> bool {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    *REGISTERED.get_or_init(|| {
        for path in FONT_CANDIDATES {
            let Ok(bytes) = fs::read(path) else {
                continue;
            };
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font("sans-serif", FontStyle::Normal, bytes).is_ok() {
                info!("Plot labels use font {}", path);
                return true;
            }
        }
        warn!("No usable system font found; the energy curve is drawn without labels");
        false
    })
}

/// Figure geometry in inches and resolution in dots per inch
#[derive(Debug, Clone)]
pub struct PlotStyle {
    pub title: String,
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl PlotStyle {
    pub fn new(title: impl Into<String>) -> Self {
        PlotStyle {
            title: title.into(),
            width_in: 6.0,
            height_in: 4.0,
            dpi: 300,
        }
    }

    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f64).round() as u32,
            (self.height_in * self.dpi as f64).round() as u32,
        )
    }

    // sizes are given in points
    fn scaled(&self, points: f64) -> u32 {
        self.font(points).round() as u32
    }

    fn font(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }
}

fn padded_range(values: &[f64], fraction: f64) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    let pad = if span > 0.0 {
        fraction * span
    } else {
        fraction * lo.abs().max(1.0)
    };
    (lo - pad, hi + pad)
}

/// Plot energy against bond length (half the lattice parameter) as a line
/// with markers and save it as a PNG.
pub fn plot_energy_curve(path: &Path, curve: &EnergyCurve, style: &PlotStyle) -> Result<()> {
    if curve.is_empty() {
        return Err(eyre!("Cannot plot an empty energy curve"));
    }
    let labelled = font_available();

    let bonds = curve.bond_lengths();
    let energies = curve.energies();
    let points: Vec<(f64, f64)> = bonds.iter().copied().zip(energies.iter().copied()).collect();
    let (x_min, x_max) = padded_range(&bonds, 0.05);
    let (y_min, y_max) = padded_range(energies, 0.08);

    let root = BitMapBackend::new(path, style.pixels()).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(style.scaled(6.0));
    if labelled {
        builder
            .caption(&style.title, ("sans-serif", style.font(12.0)))
            .x_label_area_size(style.scaled(30.0))
            .y_label_area_size(style.scaled(48.0));
    }
    let mut chart = builder.build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(BLACK.mix(0.08))
            .bold_line_style(BLACK.mix(0.2));
        if labelled {
            mesh.x_desc("Bond Length (Å)")
                .y_desc("Total Energy (eV)")
                .label_style(("sans-serif", style.font(9.0)))
                .axis_desc_style(("sans-serif", style.font(10.0)));
        } else {
            mesh.x_labels(0).y_labels(0);
        }
        mesh.draw()?;
    }

    let line_width = style.scaled(1.8);
    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        BLUE.stroke_width(line_width),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), style.scaled(3.0), BLUE.filled())),
    )?;

    root.present()?;
    info!("Energy curve saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_size_at_300_dpi() {
        let style = PlotStyle::new("C–Fe Bond Energy Curve");
        assert_eq!(style.pixels(), (1800, 1200));
    }

    #[test]
    fn test_padded_range() {
        let (lo, hi) = padded_range(&[1.0, 3.0], 0.05);
        assert!((lo - 0.9).abs() < 1e-12);
        assert!((hi - 3.1).abs() < 1e-12);

        let (lo, hi) = padded_range(&[-2.0, -2.0], 0.1);
        assert!(lo < -2.0 && hi > -2.0);
    }

    #[test]
    fn test_empty_curve_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let curve = EnergyCurve::new(vec![], vec![]).unwrap();
        let style = PlotStyle::new("empty");
        assert!(plot_energy_curve(&dir.path().join("x.png"), &curve, &style).is_err());
    }

    #[test]
    fn test_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bond_energy_curve.png");
        let curve = EnergyCurve::new(vec![1.8, 2.0, 2.2], vec![-0.5, -1.0, -0.7]).unwrap();
        plot_energy_curve(&path, &curve, &PlotStyle::new("C–Fe Bond Energy Curve")).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
