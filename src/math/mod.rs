//! Mathematical utilities: order statistics and sample L-moments.

pub mod lmoments;
pub mod order;

pub use lmoments::*;
pub use order::*;
