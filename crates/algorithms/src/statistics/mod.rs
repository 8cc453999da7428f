//! Spatial autocorrelation over grid counts
//!
//! - **moran**: Global and local Moran's I with permutation inference
//! - **permutation**: Seeded random streams and pseudo p-values
//! - **classify**: HH / LL / HL / LH / NS cluster labels

pub mod classify;
pub mod moran;
pub mod permutation;

pub use classify::{classify, summarize, validate_alpha, DEFAULT_ALPHA};
pub use moran::{global_moran, local_moran};
pub use permutation::{
    infer, validate_permutations, Inference, PermutationParams, DEFAULT_PERMUTATIONS,
    MIN_PERMUTATIONS,
};
