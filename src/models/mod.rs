//! Distribution families used for growth curves.
//!
//! Each family is implemented as small, pure functions (fit by L-moments,
//! quantile) so the analysis code can stay generic over `Distribution`.

pub mod distribution;

pub use distribution::*;
