//! Contiguity rules for lattice neighbors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which neighboring cells share a boundary with a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contiguity {
    /// Shared edge or corner (8 neighbors)
    #[default]
    Queen,
    /// Shared edge only (4 neighbors)
    Rook,
}

impl Contiguity {
    /// Check if a relative lattice position is a neighbor
    pub fn contains(&self, dr: isize, dc: isize) -> bool {
        if dr == 0 && dc == 0 {
            return false;
        }
        match self {
            Contiguity::Queen => dr.abs() <= 1 && dc.abs() <= 1,
            Contiguity::Rook => (dr.abs() == 1 && dc == 0) || (dr == 0 && dc.abs() == 1),
        }
    }

    /// Relative lattice positions of all neighbors, in row-major order
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let mut offsets = Vec::with_capacity(8);
        for dr in -1..=1 {
            for dc in -1..=1 {
                if self.contains(dr, dc) {
                    offsets.push((dr, dc));
                }
            }
        }
        offsets
    }
}

impl fmt::Display for Contiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contiguity::Queen => write!(f, "queen"),
            Contiguity::Rook => write!(f, "rook"),
        }
    }
}

impl FromStr for Contiguity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "queen" => Ok(Contiguity::Queen),
            "rook" => Ok(Contiguity::Rook),
            _ => Err(format!("Unknown contiguity: {}. Use queen or rook.", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(Contiguity::Queen.offsets().len(), 8);
        assert_eq!(Contiguity::Rook.offsets().len(), 4);
        assert!(!Contiguity::Rook.contains(1, 1));
        assert!(Contiguity::Queen.contains(-1, 1));
        assert!(!Contiguity::Queen.contains(0, 0));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Queen".parse::<Contiguity>(), Ok(Contiguity::Queen));
        assert_eq!("rook".parse::<Contiguity>(), Ok(Contiguity::Rook));
        assert!("bishop".parse::<Contiguity>().is_err());
    }
}
