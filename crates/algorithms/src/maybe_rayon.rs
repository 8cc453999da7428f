//! Parallel iteration when the `parallel` feature is on, plain iteration
//! otherwise.
//!
//! Stages only call `into_par_iter()` followed by adapters that exist on both
//! rayon's `ParallelIterator` and std's `Iterator` (`map`, `flat_map`,
//! `collect`), and only collect into ordered containers, so both builds
//! produce the same output.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
pub use serial::IntoParallelIterator;

#[cfg(not(feature = "parallel"))]
mod serial {
    /// `into_par_iter()` resolving to `into_iter()`
    pub trait IntoParallelIterator: IntoIterator + Sized {
        fn into_par_iter(self) -> Self::IntoIter {
            self.into_iter()
        }
    }

    impl<I: IntoIterator> IntoParallelIterator for I {}
}
