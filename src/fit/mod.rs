//! Growth curve estimation.
//!
//! Responsibilities:
//!
//! - measure catchment similarity from descriptors
//! - select a pooling group of donor catchments (parallel distances)
//! - standardise AMAX records by QMED and combine their L-moment ratios
//! - fit the distribution and expose the growth curve

pub mod analysis;
pub mod combiner;
pub mod normalize;
pub mod pooling;
pub mod similarity;

pub use analysis::*;
pub use combiner::*;
pub use normalize::*;
pub use pooling::*;
pub use similarity::*;
