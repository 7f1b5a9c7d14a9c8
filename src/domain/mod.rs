//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - catchments, their descriptors and AMAX records (`Catchment`, `Descriptors`, `AmaxRecord`)
//! - analysis configuration enums (`GrowthCurveMethod`, `Distribution`, `SubjectInclusion`)
//! - fit outputs and the saved curve schema (`DistributionParams`, `CurveFile`)

pub mod types;

pub use types::*;
