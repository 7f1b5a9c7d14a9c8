//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - loaded from a JSON catalog
//! - used in-memory during donor selection and fitting
//! - exported to JSON/CSV and reloaded later for plotting

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Which statistics feed the growth curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GrowthCurveMethod {
    /// The subject's own AMAX record only.
    SingleSite,
    /// The subject plus its donors, combined with FEH weights.
    PoolingGroup,
}

impl GrowthCurveMethod {
    pub fn display_name(self) -> &'static str {
        match self {
            GrowthCurveMethod::SingleSite => "single site",
            GrowthCurveMethod::PoolingGroup => "pooling group",
        }
    }
}

/// Distribution family fitted to the L-moment ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Generalised logistic (FEH default).
    Glo,
    /// Generalised extreme value.
    Gev,
}

impl Distribution {
    pub fn display_name(self) -> &'static str {
        match self {
            Distribution::Glo => "GLO",
            Distribution::Gev => "GEV",
        }
    }
}

/// Whether the subject joins its own pooling group as a zero-distance member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SubjectInclusion {
    /// Include the subject when it would itself qualify as a donor
    /// (long enough record, suitable for pooling, not urbanised).
    Auto,
    /// Always include the subject.
    Force,
    /// Never include the subject.
    Exclude,
}

/// Scalar catchment descriptors that can be looked up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Descriptor {
    DtmArea,
    Bfihost,
    Sprhost,
    Saar,
    Farl,
    Urbext2000,
    Fpext,
}

impl Descriptor {
    pub const ALL: [Descriptor; 7] = [
        Descriptor::DtmArea,
        Descriptor::Bfihost,
        Descriptor::Sprhost,
        Descriptor::Saar,
        Descriptor::Farl,
        Descriptor::Urbext2000,
        Descriptor::Fpext,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Descriptor::DtmArea => "DTM AREA",
            Descriptor::Bfihost => "BFIHOST",
            Descriptor::Sprhost => "SPRHOST",
            Descriptor::Saar => "SAAR",
            Descriptor::Farl => "FARL",
            Descriptor::Urbext2000 => "URBEXT2000",
            Descriptor::Fpext => "FPEXT",
        }
    }
}

/// British National Grid reference (metres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRef {
    pub easting: f64,
    pub northing: f64,
}

/// Physical catchment descriptors. Every value may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Descriptors {
    /// Drainage area from the digital terrain model (km²).
    pub dtm_area: Option<f64>,
    /// Base flow index from HOST soil classes.
    pub bfihost: Option<f64>,
    /// Standard percentage runoff from HOST soil classes (%).
    pub sprhost: Option<f64>,
    /// Standard average annual rainfall 1961-1990 (mm).
    pub saar: Option<f64>,
    /// Flood attenuation by reservoirs and lakes (1 = no attenuation).
    pub farl: Option<f64>,
    /// Urban extent fraction, 2000 land cover.
    pub urbext2000: Option<f64>,
    /// Flood plain extent fraction.
    pub fpext: Option<f64>,
    pub centroid_ngr: Option<GridRef>,
}

impl Descriptors {
    pub fn get(&self, descriptor: Descriptor) -> Option<f64> {
        match descriptor {
            Descriptor::DtmArea => self.dtm_area,
            Descriptor::Bfihost => self.bfihost,
            Descriptor::Sprhost => self.sprhost,
            Descriptor::Saar => self.saar,
            Descriptor::Farl => self.farl,
            Descriptor::Urbext2000 => self.urbext2000,
            Descriptor::Fpext => self.fpext,
        }
    }
}

/// Quality flag on an annual maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmaxFlag {
    #[default]
    Valid,
    /// Excluded from all statistics (e.g. incomplete water year).
    Rejected,
}

/// One annual maximum flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmaxRecord {
    /// Date of the annual peak.
    pub date: NaiveDate,
    /// Peak flow (m³/s).
    pub flow: f64,
    /// Peak stage (m), when recorded.
    #[serde(default)]
    pub stage: Option<f64>,
    #[serde(default)]
    pub flag: AmaxFlag,
}

impl AmaxRecord {
    pub fn new(date: NaiveDate, flow: f64, stage: Option<f64>) -> Self {
        Self {
            date,
            flow,
            stage,
            flag: AmaxFlag::Valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.flag == AmaxFlag::Valid
    }
}

/// A gauged (or ungauged) catchment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catchment {
    /// Gauging station number.
    pub id: u32,
    pub location: String,
    pub watercourse: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub descriptors: Descriptors,
    #[serde(default)]
    pub amax_records: Vec<AmaxRecord>,
    #[serde(default)]
    pub is_suitable_for_pooling: bool,
    #[serde(default)]
    pub is_suitable_for_qmed: bool,
}

impl Catchment {
    pub fn new(id: u32, location: impl Into<String>, watercourse: impl Into<String>) -> Self {
        Self {
            id,
            location: location.into(),
            watercourse: watercourse.into(),
            country: None,
            descriptors: Descriptors::default(),
            amax_records: Vec::new(),
            is_suitable_for_pooling: false,
            is_suitable_for_qmed: false,
        }
    }

    pub fn with_descriptors(mut self, descriptors: Descriptors) -> Self {
        self.descriptors = descriptors;
        self
    }

    /// Attach AMAX records, ordering them by date.
    pub fn with_amax_records(mut self, records: Vec<AmaxRecord>) -> Result<Self, AnalysisError> {
        self.amax_records = records;
        self.normalize_records()?;
        Ok(self)
    }

    /// Sort records by date and reject duplicate dates.
    pub fn normalize_records(&mut self) -> Result<(), AnalysisError> {
        self.amax_records.sort_by_key(|r| r.date);
        if let Some(pair) = self.amax_records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(AnalysisError::DuplicateRecordDate {
                id: self.id,
                date: pair[0].date,
            });
        }
        Ok(())
    }

    /// Number of valid AMAX records.
    pub fn record_length(&self) -> usize {
        self.amax_records.iter().filter(|r| r.is_valid()).count()
    }

    /// Valid AMAX flows in date order.
    pub fn valid_flows(&self) -> Vec<f64> {
        self.amax_records
            .iter()
            .filter(|r| r.is_valid())
            .map(|r| r.flow)
            .collect()
    }

    /// Median annual maximum flow (the index flood).
    pub fn qmed(&self) -> Option<f64> {
        crate::math::median(&self.valid_flows())
    }

    /// Whether the urban extent is at or above `cutoff`.
    ///
    /// A missing URBEXT2000 counts as rural.
    pub fn is_urban(&self, cutoff: f64) -> bool {
        self.descriptors.urbext2000.is_some_and(|u| u >= cutoff)
    }

    /// Short label for tables: `"37017 Blackwater @ Appleford"`.
    pub fn label(&self) -> String {
        format!("{} {} @ {}", self.id, self.watercourse, self.location)
    }
}

/// Donor selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolingConfig {
    /// Combined station-years at which donor accumulation stops.
    pub record_target: usize,
    /// Candidates with URBEXT2000 at or above this are not donors.
    pub urban_cutoff: f64,
    /// Candidates with fewer valid AMAX records are not donors.
    pub min_record_length: usize,
    pub subject_inclusion: SubjectInclusion,
}

impl Default for PoolingConfig {
    fn default() -> Self {
        Self {
            record_target: 500,
            urban_cutoff: 0.03,
            min_record_length: 10,
            subject_inclusion: SubjectInclusion::Auto,
        }
    }
}

/// Fitted distribution parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionParams {
    pub location: f64,
    pub scale: f64,
    pub shape: f64,
}

/// One row of a growth-factor table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthFactor {
    pub return_period: f64,
    pub probability: f64,
    pub growth_factor: f64,
}

/// Return periods (years) reported by default.
pub const DEFAULT_RETURN_PERIODS: [f64; 8] = [2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 1000.0];

/// A saved growth curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub subject_id: u32,
    pub subject: String,
    pub method: GrowthCurveMethod,
    pub distribution: Distribution,
    pub params: DistributionParams,
    pub l_cv: f64,
    pub l_skew: f64,
    /// Donor station ids in rank order (empty for single-site curves).
    pub donors: Vec<u32>,
    pub table: Vec<GrowthFactor>,
}
