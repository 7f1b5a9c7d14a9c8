//! Export pooling group members to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;
use crate::fit::MemberStatistics;

/// Write one row per pooling group member (subject first when included).
///
/// Columns: `id,location,watercourse,distance,record_length,l_cv,l_skew,l_cv_weight,l_skew_weight`.
pub fn write_pooling_group_csv(path: &Path, members: &[MemberStatistics]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_pooling_group(file, members)
}

/// Column order of the export; matches the `MemberStatistics` fields.
const HEADER: [&str; 9] = [
    "id",
    "location",
    "watercourse",
    "distance",
    "record_length",
    "l_cv",
    "l_skew",
    "l_cv_weight",
    "l_skew_weight",
];

pub fn write_pooling_group<W: std::io::Write>(out: W, members: &[MemberStatistics]) -> Result<(), AppError> {
    // Header written explicitly so an empty group still gets one.
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer
        .write_record(HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;
    for m in members {
        writer
            .serialize(m)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
