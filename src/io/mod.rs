//! Input/output helpers.
//!
//! - catchment catalog JSON read/write (`catalog`)
//! - AMAX CSV import + validation (`amax`)
//! - pooling group CSV export (`export`)
//! - growth curve JSON read/write (`curve`)

pub mod amax;
pub mod catalog;
pub mod curve;
pub mod export;

pub use amax::*;
pub use catalog::*;
pub use curve::*;
pub use export::*;
