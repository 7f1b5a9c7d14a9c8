//! Read/write growth curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted growth curve:
//! - method + distribution + parameters
//! - the L-moment ratios it was fitted to and the donor ids behind them
//! - a precomputed growth factor table for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{Catchment, CurveFile};
use crate::error::AppError;
use crate::fit::GrowthCurve;

/// Assemble the portable file for `curve`, tabulated at `return_periods`.
pub fn curve_file(
    subject: &Catchment,
    curve: &GrowthCurve,
    donors: &[u32],
    return_periods: &[f64],
) -> Result<CurveFile, AppError> {
    Ok(CurveFile {
        tool: "feh".to_string(),
        subject_id: subject.id,
        subject: subject.label(),
        method: curve.method,
        distribution: curve.distribution,
        params: curve.params,
        l_cv: curve.ratios.l_cv,
        l_skew: curve.ratios.l_skew,
        donors: donors.to_vec(),
        table: curve.table(return_periods)?,
    })
}

/// Write a curve JSON file.
pub fn write_growth_curve_json(path: &Path, file: &CurveFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;
    Ok(())
}

/// Read a curve JSON file.
pub fn read_growth_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

/// Rebuild a callable curve from a saved file.
pub fn growth_curve_from_file(file: &CurveFile) -> GrowthCurve {
    GrowthCurve {
        method: file.method,
        distribution: file.distribution,
        params: file.params,
        ratios: crate::fit::LMomentRatios {
            l_cv: file.l_cv,
            l_skew: file.l_skew,
        },
    }
}
