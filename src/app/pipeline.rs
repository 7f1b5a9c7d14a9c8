//! Shared growth curve pipeline used by the `growth-curve` and `donors` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! catalog load -> subject resolution -> donor selection -> L-moments -> fit -> table
//!
//! The command handlers can then focus on presentation (printing vs exports).

use std::path::PathBuf;

use tracing::{info, warn};

use crate::catalog::InMemoryCatalog;
use crate::domain::{Catchment, DEFAULT_RETURN_PERIODS, Distribution, GrowthCurveMethod, GrowthFactor, PoolingConfig};
use crate::error::AppError;
use crate::fit::{GrowthCurve, GrowthCurveAnalysis, MemberStatistics};

/// Where the subject catchment comes from.
#[derive(Debug, Clone)]
pub enum SubjectSource {
    /// Station id looked up in the catalog.
    CatalogId(u32),
    /// Catchment JSON file.
    File(PathBuf),
}

/// Inputs resolved from files, before any statistics are computed.
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub subject: Catchment,
    pub catalog: Option<InMemoryCatalog>,
}

/// Settings for one growth curve run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub method: GrowthCurveMethod,
    pub distribution: Distribution,
    pub pooling: PoolingConfig,
    pub return_periods: Vec<f64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            method: GrowthCurveMethod::PoolingGroup,
            distribution: Distribution::Glo,
            pooling: PoolingConfig::default(),
            return_periods: DEFAULT_RETURN_PERIODS.to_vec(),
        }
    }
}

/// All computed outputs of a single `feh growth-curve` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub curve: GrowthCurve,
    pub table: Vec<GrowthFactor>,
    /// Pooling group members (subject first when included); empty for single-site runs.
    pub members: Vec<MemberStatistics>,
    /// Donor ids in rank order.
    pub donors: Vec<u32>,
}

/// Load the catalog (if any), resolve the subject and attach an AMAX CSV.
pub fn load_inputs(
    source: &SubjectSource,
    catalog_path: Option<&std::path::Path>,
    amax_path: Option<&std::path::Path>,
) -> Result<RunInputs, AppError> {
    let catalog = catalog_path.map(crate::io::load_catalog).transpose()?;

    let mut subject = match source {
        SubjectSource::CatalogId(id) => {
            let catalog = catalog
                .as_ref()
                .ok_or_else(|| AppError::new(2, "`--subject` needs a catalog (--catalog, FEH_CATALOG or config)."))?;
            catalog.require(*id)?.clone()
        }
        SubjectSource::File(path) => crate::io::load_catchment(path)?,
    };

    if let Some(path) = amax_path {
        let import = crate::io::load_amax_csv(path)?;
        for e in &import.row_errors {
            warn!(line = e.line, "skipped AMAX row: {}", e.message);
        }
        info!(
            rows = import.rows_read,
            used = import.records.len(),
            "imported AMAX series for subject"
        );
        subject = subject.with_amax_records(import.records)?;
    }

    Ok(RunInputs { subject, catalog })
}

/// Fit the growth curve and tabulate it.
pub fn run_growth_curve(inputs: &RunInputs, settings: &RunSettings) -> Result<RunOutput, AppError> {
    let mut analysis = GrowthCurveAnalysis::new(&inputs.subject, inputs.catalog.as_ref())
        .with_config(settings.pooling.clone())
        .with_distribution(settings.distribution);

    // The pooled ratios come with the member table; fit from them directly.
    let (curve, members) = match settings.method {
        GrowthCurveMethod::PoolingGroup => {
            let stats = analysis.pooled_statistics()?;
            let curve = GrowthCurve::fit(settings.method, settings.distribution, stats.ratios)?;
            info!(
                members = stats.members.len(),
                l_cv = stats.ratios.l_cv,
                l_skew = stats.ratios.l_skew,
                "fitted pooled growth curve"
            );
            (curve, stats.members)
        }
        GrowthCurveMethod::SingleSite => (analysis.growth_curve(settings.method)?, Vec::new()),
    };
    let donors = analysis.donor_catchments().map(|g| g.ids()).unwrap_or_default();
    let table = curve.table(&settings.return_periods)?;

    Ok(RunOutput {
        curve,
        table,
        members,
        donors,
    })
}

/// Pooling group members with statistics, without fitting a distribution.
pub fn run_pooling_group(inputs: &RunInputs, pooling: &PoolingConfig) -> Result<Vec<MemberStatistics>, AppError> {
    let mut analysis =
        GrowthCurveAnalysis::new(&inputs.subject, inputs.catalog.as_ref()).with_config(pooling.clone());
    Ok(analysis.pooled_statistics()?.members)
}
