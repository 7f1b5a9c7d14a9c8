//! Error types.
//!
//! - `AnalysisError`: typed failures of the growth-curve core (statistics,
//!   distribution fitting, catalog consistency). Library callers match on these.
//! - `AppError`: what the `feh` binary reports, carrying a process exit code.
//!
//! Exit codes:
//! - 2: input / configuration / I/O problems
//! - 3: insufficient or degenerate AMAX data
//! - 4: distribution fit failures

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Distribution;

/// Failures raised by the growth-curve analysis itself.
///
/// Incomparable catchments (missing descriptors) and empty donor sets are not
/// errors; they are encoded as an infinite distance and an empty group.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("catchment {id}: {got} valid AMAX records, need at least {min}")]
    TooFewRecords { id: u32, got: usize, min: usize },

    #[error("catchment {id}: AMAX sample has no spread (L2 <= 0)")]
    DegenerateSample { id: u32 },

    #[error("pooling group has no members to combine")]
    EmptyPoolingGroup,

    #[error("L-moments (L-CV={l_cv:.4}, L-skew={l_skew:.4}) are outside the feasible region of {}", .distribution.display_name())]
    InfeasibleLMoments {
        l_cv: f64,
        l_skew: f64,
        distribution: Distribution,
    },

    #[error("non-exceedance probability {0} is not in (0, 1)")]
    InvalidProbability(f64),

    #[error("return period {0} must be greater than 1 year")]
    InvalidReturnPeriod(f64),

    #[error("catchment {id}: duplicate AMAX record for {date}")]
    DuplicateRecordDate { id: u32, date: NaiveDate },

    #[error("catchment {0} appears more than once in the catalog")]
    DuplicateCatchment(u32),

    #[error("catchment {0} not found in the catalog")]
    UnknownCatchment(u32),
}

impl AnalysisError {
    /// Exit code used when the error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            AnalysisError::TooFewRecords { .. }
            | AnalysisError::DegenerateSample { .. }
            | AnalysisError::EmptyPoolingGroup => 3,
            AnalysisError::InfeasibleLMoments { .. } => 4,
            AnalysisError::InvalidProbability(_)
            | AnalysisError::InvalidReturnPeriod(_)
            | AnalysisError::DuplicateRecordDate { .. }
            | AnalysisError::DuplicateCatchment(_)
            | AnalysisError::UnknownCatchment(_) => 2,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
