//! Grid cell

use serde::{Deserialize, Serialize};

use crate::vector::BoundingBox;

/// One square of the analysis grid.
///
/// `index` is the identity used by every downstream structure (counts,
/// weights, statistics). `row`/`col` locate the cell in the lattice it was
/// cut from, with row 0 at the lattice's minimum y. Edges are computed from
/// the lattice origin, so adjacent cells share bit-identical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub bbox: BoundingBox,
}

impl Cell {
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Point;

    #[test]
    fn test_cell_box_is_closed() {
        let c = Cell {
            index: 0,
            row: 1,
            col: 2,
            bbox: BoundingBox::new(200.0, 100.0, 300.0, 200.0),
        };
        assert!(c.bbox().contains_point(&Point::new(300.0, 200.0)));
        assert!(!c.bbox().contains_point(&Point::new(300.1, 200.0)));
    }
}
