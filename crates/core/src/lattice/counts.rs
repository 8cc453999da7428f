//! Per-cell feature counts

use serde::{Deserialize, Serialize};

/// Number of point features falling in each cell, indexed by cell index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountVector(Vec<u64>);

impl CountVector {
    /// All-zero counts for `n` cells
    pub fn zeros(n: usize) -> Self {
        Self(vec![0; n])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u64> {
        self.0.get(index).copied()
    }

    pub fn increment(&mut self, index: usize) {
        self.0[index] += 1;
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Counts as floating point values for the statistics engine
    pub fn as_f64(&self) -> Vec<f64> {
        self.0.iter().map(|&c| c as f64).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<u64>> for CountVector {
    fn from(v: Vec<u64>) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_total_and_increment() {
        let mut c = CountVector::zeros(3);
        c.increment(1);
        c.increment(1);
        c.increment(2);
        assert_eq!(c.as_slice(), &[0, 2, 1]);
        assert_eq!(c.total(), 3);
        assert_eq!(c.as_f64(), vec![0.0, 2.0, 1.0]);
    }
}
