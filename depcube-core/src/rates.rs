//! Per-cell error rates

use crate::cube::{Coord, Cube};
use std::collections::BTreeMap;

/// Error rate per coordinate, defined wherever the error cube has a cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateCube {
    cells: BTreeMap<Coord, f64>,
}

impl RateCube {
    /// Rate at a coordinate, if the error cube had that cell
    pub fn get(&self, coord: &Coord) -> Option<f64> {
        self.cells.get(coord).copied()
    }

    /// Cells in coordinate order
    pub fn iter(&self) -> impl Iterator<Item = (&Coord, f64)> {
        self.cells.iter().map(|(coord, &rate)| (coord, rate))
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether there are no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Divide every error cell by the total at the same coordinate.
///
/// Every error cell has a nonzero total by construction, since an error is
/// only ever counted together with its total.
pub fn derive_rates(total: &Cube, errors: &Cube) -> RateCube {
    let cells = errors
        .iter()
        .map(|(coord, count)| {
            let denominator = total.get(coord);
            debug_assert!(denominator > 0, "error cell {coord} has no total");
            (coord.clone(), count as f64 / denominator as f64)
        })
        .collect();

    RateCube { cells }
}
