//! Periodic cells and the two-atom structures swept by the scan

use crate::config::CellParams;
use color_eyre::eyre::{ensure, eyre, Result};
use nalgebra::Vector3;
use periodic_table_on_an_enum::Element;

/// Orthorhombic periodic cell described by its three edge lengths (Å).
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCell {
    pub lengths: Vector3<f64>,
    pub pbc: [bool; 3],
}

impl UnitCell {
    pub fn periodic(a: f64, b: f64, c: f64) -> Self {
        UnitCell {
            lengths: Vector3::new(a, b, c),
            pbc: [true; 3],
        }
    }

    pub fn a(&self) -> f64 {
        self.lengths.x
    }

    pub fn b(&self) -> f64 {
        self.lengths.y
    }

    pub fn c(&self) -> f64 {
        self.lengths.z
    }

    /// Row-major cell matrix, one lattice vector per row.
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.lengths.x, 0.0, 0.0],
            [0.0, self.lengths.y, 0.0],
            [0.0, 0.0, self.lengths.z],
        ]
    }
}

/// Atoms placed in a periodic cell, in Cartesian coordinates (Å).
#[derive(Debug, Clone)]
pub struct Structure {
    pub elements: Vec<Element>,
    pub positions: Vec<Vector3<f64>>,
    pub cell: UnitCell,
}

impl Structure {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn symbols(&self) -> Vec<&'static str> {
        self.elements.iter().map(|e| e.get_symbol()).collect()
    }

    /// Iterate over `(symbol, position)` pairs in atom order.
    pub fn atoms(&self) -> impl Iterator<Item = (&'static str, &Vector3<f64>)> + '_ {
        self.elements
            .iter()
            .map(|e| e.get_symbol())
            .zip(self.positions.iter())
    }

    /// Chemical formula in atom order, e.g. `CFe`.
    pub fn formula(&self) -> String {
        self.symbols().concat()
    }
}

/// Builds the two-atom cell for a given in-plane lattice parameter.
///
/// For lattice parameter `l` the cell is `(l, l * aspect_ratio, height)`;
/// the first atom sits at `(0, 0, plane_z)` and the second at
/// `(l/2, b/2, plane_z)`.
#[derive(Debug, Clone)]
pub struct PairCellBuilder {
    pub species: [Element; 2],
    pub aspect_ratio: f64,
    pub height: f64,
    pub plane_z: f64,
}

impl PairCellBuilder {
    pub fn from_params(params: &CellParams) -> Result<Self> {
        let species = params.species();
        ensure!(
            species.len() == 2,
            "The scanned cell holds exactly two atoms, got species {:?}",
            species
        );

        let mut elements = Vec::with_capacity(2);
        for symbol in &species {
            let element = Element::from_symbol(symbol)
                .ok_or_else(|| eyre!("Invalid element symbol: {}", symbol))?;
            elements.push(element);
        }

        let builder = PairCellBuilder {
            species: [elements[0].clone(), elements[1].clone()],
            aspect_ratio: params.aspect_ratio(),
            height: params.height(),
            plane_z: params.plane_z(),
        };
        builder.validate()?;
        Ok(builder)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.aspect_ratio > 0.0,
            "Cell aspect ratio must be positive, got {}",
            self.aspect_ratio
        );
        ensure!(
            self.height > 0.0,
            "Cell height must be positive, got {}",
            self.height
        );
        Ok(())
    }

    /// Secondary in-plane cell length `b` for lattice parameter `l`.
    pub fn derived_length(&self, l: f64) -> f64 {
        l * self.aspect_ratio
    }

    pub fn cell(&self, l: f64) -> UnitCell {
        UnitCell::periodic(l, self.derived_length(l), self.height)
    }

    pub fn build(&self, l: f64) -> Structure {
        let b = self.derived_length(l);
        Structure {
            elements: self.species.to_vec(),
            positions: vec![
                Vector3::new(0.0, 0.0, self.plane_z),
                Vector3::new(l / 2.0, b / 2.0, self.plane_z),
            ],
            cell: self.cell(l),
        }
    }

    /// Label for plot titles, e.g. `C–Fe`.
    pub fn pair_label(&self) -> String {
        format!(
            "{}–{}",
            self.species[0].get_symbol(),
            self.species[1].get_symbol()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CellParams;

    fn default_builder() -> PairCellBuilder {
        PairCellBuilder::from_params(&CellParams::default()).unwrap()
    }

    #[test]
    fn test_derived_length_uses_fixed_ratio() {
        let builder = default_builder();
        for l in [1.5, 1.9444444444444444, 2.5] {
            assert!((builder.derived_length(l) - l * 1.732).abs() < 1e-12);
        }
    }

    #[test]
    fn test_build_places_atoms() {
        let builder = default_builder();
        let structure = builder.build(2.0);

        assert_eq!(structure.len(), 2);
        assert_eq!(structure.formula(), "CFe");
        assert_eq!(structure.positions[0], Vector3::new(0.0, 0.0, 10.0));
        assert!((structure.positions[1].x - 1.0).abs() < 1e-12);
        assert!((structure.positions[1].y - 1.732).abs() < 1e-12);
        assert_eq!(structure.positions[1].z, 10.0);
        assert_eq!(structure.cell.pbc, [true, true, true]);
        assert_eq!(structure.cell.c(), 20.0);
        assert!((structure.cell.b() - 3.464).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_unknown_symbol() {
        let params = CellParams {
            species: Some(vec!["C".to_string(), "Xx".to_string()]),
            ..CellParams::default()
        };
        assert!(PairCellBuilder::from_params(&params).is_err());
    }

    #[test]
    fn test_rejects_wrong_atom_count() {
        let params = CellParams {
            species: Some(vec!["C".to_string()]),
            ..CellParams::default()
        };
        assert!(PairCellBuilder::from_params(&params).is_err());
    }

    #[test]
    fn test_pair_label() {
        assert_eq!(default_builder().pair_label(), "C–Fe");
    }
}
