//! Run configuration.
//!
//! Layers, later wins:
//! 1. built-in defaults
//! 2. TOML file (`feh.toml` in the working directory, or `--config PATH`)
//! 3. environment, after loading `.env`: `FEH_CATALOG`, `FEH_RECORD_TARGET`,
//!    `FEH_URBAN_CUTOFF`, `FEH_LOG`
//! 4. command-line flags (applied by `app`)
//!
//! ```toml
//! catalog = "catalog.json"
//! distribution = "glo"
//! log = "info"
//!
//! [pooling]
//! record_target = 500
//! urban_cutoff = 0.03
//! min_record_length = 10
//! subject_inclusion = "auto"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Distribution, PoolingConfig};
use crate::error::AppError;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "feh.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Catalog JSON used for donor selection.
    pub catalog: Option<PathBuf>,
    pub distribution: Distribution,
    pub pooling: PoolingConfig,
    /// `tracing` filter directive, e.g. `info` or `feh_growth=debug`.
    pub log: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            distribution: Distribution::Glo,
            pooling: PoolingConfig::default(),
            log: None,
        }
    }
}

impl AppConfig {
    /// Defaults, then the TOML file, then the process environment.
    ///
    /// An explicit `path` must exist; the default `feh.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| AppError::new(2, format!("Failed to read config '{}': {e}", path.display())))?;
        let config = Self::from_toml_str(&contents)
            .map_err(|e| AppError::new(2, format!("Invalid config '{}': {e}", path.display())))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Override fields from environment variables, read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), AppError> {
        if let Some(v) = lookup("FEH_CATALOG").filter(|v| !v.trim().is_empty()) {
            self.catalog = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("FEH_RECORD_TARGET") {
            self.pooling.record_target = v
                .trim()
                .parse()
                .map_err(|_| AppError::new(2, format!("FEH_RECORD_TARGET must be an integer, got '{v}'")))?;
        }
        if let Some(v) = lookup("FEH_URBAN_CUTOFF") {
            self.pooling.urban_cutoff = v
                .trim()
                .parse()
                .map_err(|_| AppError::new(2, format!("FEH_URBAN_CUTOFF must be a number, got '{v}'")))?;
        }
        if let Some(v) = lookup("FEH_LOG").filter(|v| !v.trim().is_empty()) {
            self.log = Some(v);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let p = &self.pooling;
        if p.record_target == 0 {
            return Err(AppError::new(2, "record_target must be > 0."));
        }
        if !(p.urban_cutoff.is_finite() && p.urban_cutoff > 0.0 && p.urban_cutoff <= 1.0) {
            return Err(AppError::new(2, "urban_cutoff must be in (0, 1]."));
        }
        if p.min_record_length < crate::math::MIN_SAMPLE_LEN {
            return Err(AppError::new(
                2,
                format!("min_record_length must be at least {}.", crate::math::MIN_SAMPLE_LEN),
            ));
        }
        Ok(())
    }
}
