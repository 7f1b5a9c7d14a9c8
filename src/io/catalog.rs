//! Read/write catchment catalog JSON files.
//!
//! A catalog file is a JSON array of `domain::Catchment`; a catchment file is
//! a single object of the same schema.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::info;

use crate::catalog::{CatchmentCatalog, InMemoryCatalog};
use crate::domain::Catchment;
use crate::error::AppError;

/// Load a catalog file into memory.
pub fn load_catalog(path: &Path) -> Result<InMemoryCatalog, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open catalog '{}': {e}", path.display())))?;
    let catchments: Vec<Catchment> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid catalog JSON '{}': {e}", path.display())))?;
    let catalog = InMemoryCatalog::new(catchments)
        .map_err(|e| AppError::new(2, format!("Invalid catalog '{}': {e}", path.display())))?;
    info!(path = %path.display(), catchments = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Load a single catchment file.
pub fn load_catchment(path: &Path) -> Result<Catchment, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open catchment '{}': {e}", path.display())))?;
    let mut catchment: Catchment = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid catchment JSON '{}': {e}", path.display())))?;
    catchment
        .normalize_records()
        .map_err(|e| AppError::new(2, e.to_string()))?;
    Ok(catchment)
}

pub fn write_catalog(path: &Path, catchments: &[Catchment]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create catalog '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), catchments)
        .map_err(|e| AppError::new(2, format!("Failed to write catalog JSON: {e}")))?;
    Ok(())
}
