//! AMAX series import from CSV.
//!
//! Expected columns (case-insensitive, any order):
//!
//! - `date` (required): water-year date of the annual maximum
//! - `flow` (required): peak flow in m³/s
//! - `stage` (optional): peak stage in m
//! - `flag` (optional): `0`/`valid` or `1`/`2`/`rejected`
//!
//! Bad rows are skipped and reported; the file fails only when no row is usable.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{AmaxFlag, AmaxRecord};
use crate::error::AppError;

/// A row-level error encountered during import.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AmaxImport {
    pub records: Vec<AmaxRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Read an AMAX CSV file.
pub fn load_amax_csv(path: &Path) -> Result<AmaxImport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open AMAX CSV '{}': {e}", path.display())))?;
    read_amax_csv(file)
}

pub fn read_amax_csv<R: std::io::Read>(reader: R) -> Result<AmaxImport, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read AMAX CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    for required in ["date", "flow"] {
        if !header_map.contains_key(required) {
            return Err(AppError::new(2, format!("Missing required column: `{required}`")));
        }
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, &header_map));
        match parsed {
            Ok(record) => records.push(record),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if records.is_empty() {
        return Err(AppError::new(3, "No valid AMAX rows in CSV."));
    }

    Ok(AmaxImport {
        records,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase(), idx))
        .collect()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<AmaxRecord, String> {
    let date = parse_date(get_required(record, header_map, "date")?)?;
    let flow_raw = get_required(record, header_map, "flow")?;
    let flow = flow_raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| format!("Invalid flow '{flow_raw}'."))?;
    let stage = get_optional(record, header_map, "stage").and_then(|s| s.parse::<f64>().ok());
    let flag = match get_optional(record, header_map, "flag") {
        None => AmaxFlag::Valid,
        Some(s) => parse_flag(s)?,
    };
    Ok(AmaxRecord {
        date,
        flow,
        stage: stage.filter(|v| v.is_finite()),
        flag,
    })
}

fn parse_flag(s: &str) -> Result<AmaxFlag, String> {
    match s.to_ascii_lowercase().as_str() {
        "0" | "valid" => Ok(AmaxFlag::Valid),
        "1" | "2" | "rejected" => Ok(AmaxFlag::Rejected),
        other => Err(format!("Unknown flag '{other}'.")),
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    get_optional(record, header_map, name).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    FMTS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("Invalid date '{s}'. Expected YYYY-MM-DD, DD/MM/YYYY or YYYY/MM/DD."))
}
