//! `feh-growth` library crate.
//!
//! FEH statistical flood growth curves: pooling group selection by catchment
//! similarity, QMED-standardised AMAX records, weighted L-moment pooling and
//! GLO/GEV fitting.
//!
//! The binary (`feh`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the analysis can be embedded in other tools with their own catalog
//!
//! ```no_run
//! use feh_growth::domain::GrowthCurveMethod;
//! use feh_growth::fit::GrowthCurveAnalysis;
//!
//! let catalog = feh_growth::io::load_catalog("catalog.json".as_ref())?;
//! let subject = catalog.require(37017)?.clone();
//! let curve = GrowthCurveAnalysis::new(&subject, Some(&catalog))
//!     .growth_curve(GrowthCurveMethod::PoolingGroup)?;
//! println!("Q100/QMED = {:.3}", curve.for_return_period(100.0)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;

#[cfg(test)]
mod fixtures;
