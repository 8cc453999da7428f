//! Regular square lattice clipped to a boundary
//!
//! - [`Cell`]: one grid square with a stable index
//! - [`Grid`]: the surviving cells plus the lattice they were cut from
//! - [`Contiguity`]: which lattice offsets count as neighbors
//! - [`WeightsGraph`]: row-standardized contiguity weights
//! - [`CountVector`]: per-cell feature counts

mod cell;
mod counts;
mod grid;
mod neighborhood;
mod weights;

pub use cell::Cell;
pub use counts::CountVector;
pub use grid::Grid;
pub use neighborhood::Contiguity;
pub use weights::WeightsGraph;
