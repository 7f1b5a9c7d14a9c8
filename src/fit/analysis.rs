//! Growth curve analysis for one subject catchment.
//!
//! Flow for `GrowthCurveMethod::PoolingGroup`:
//! donor selection (cached) -> weighted L-moments -> distribution fit.
//! `GrowthCurveMethod::SingleSite` skips the first step and uses the
//! subject's own record.

use tracing::{info, warn};

use crate::catalog::{CatchmentCatalog, InMemoryCatalog};
use crate::domain::{Catchment, Distribution, DistributionParams, GrowthCurveMethod, GrowthFactor, PoolingConfig};
use crate::error::AnalysisError;
use crate::fit::combiner::{self, LMomentRatios, PooledStatistics};
use crate::fit::pooling::{self, PoolingGroup};
use crate::models::{fit_growth_curve, quantile};

/// A fitted, QMED-scaled growth curve: `x(0.5) = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthCurve {
    pub method: GrowthCurveMethod,
    pub distribution: Distribution,
    pub params: DistributionParams,
    pub ratios: LMomentRatios,
}

impl GrowthCurve {
    /// Fit `distribution` to `ratios` by the method of L-moments.
    pub fn fit(
        method: GrowthCurveMethod,
        distribution: Distribution,
        ratios: LMomentRatios,
    ) -> Result<Self, AnalysisError> {
        let params = fit_growth_curve(distribution, ratios.l_cv, ratios.l_skew)?;
        Ok(Self {
            method,
            distribution,
            params,
            ratios,
        })
    }

    /// Growth factor for non-exceedance probability `p ∈ (0, 1)`.
    pub fn quantile(&self, p: f64) -> Result<f64, AnalysisError> {
        if !(p > 0.0 && p < 1.0) {
            return Err(AnalysisError::InvalidProbability(p));
        }
        Ok(quantile(self.distribution, p, &self.params))
    }

    /// Growth factor for a return period in years (`p = 1 - 1/T`).
    pub fn for_return_period(&self, return_period: f64) -> Result<f64, AnalysisError> {
        self.quantile(return_period_probability(return_period)?)
    }

    pub fn table(&self, return_periods: &[f64]) -> Result<Vec<GrowthFactor>, AnalysisError> {
        return_periods
            .iter()
            .map(|&t| {
                let probability = return_period_probability(t)?;
                Ok(GrowthFactor {
                    return_period: t,
                    probability,
                    growth_factor: self.quantile(probability)?,
                })
            })
            .collect()
    }

    /// The curve as a plain function of `p`.
    pub fn as_fn(&self) -> impl Fn(f64) -> Result<f64, AnalysisError> + '_ {
        move |p| self.quantile(p)
    }

    pub fn into_fn(self) -> impl Fn(f64) -> Result<f64, AnalysisError> {
        move |p| self.quantile(p)
    }
}

/// Non-exceedance probability for a return period `T > 1`.
pub fn return_period_probability(return_period: f64) -> Result<f64, AnalysisError> {
    if !(return_period > 1.0 && return_period.is_finite()) {
        return Err(AnalysisError::InvalidReturnPeriod(return_period));
    }
    Ok(1.0 - 1.0 / return_period)
}

/// Analysis state for one subject: settings plus the cached pooling group.
///
/// The catalog is borrowed; donor distances live in the cached group, so
/// several analyses can share one catalog.
#[derive(Debug)]
pub struct GrowthCurveAnalysis<'a, C: CatchmentCatalog + ?Sized = InMemoryCatalog> {
    subject: &'a Catchment,
    catalog: Option<&'a C>,
    config: PoolingConfig,
    distribution: Distribution,
    donors: Option<PoolingGroup<'a>>,
}

impl<'a> GrowthCurveAnalysis<'a, InMemoryCatalog> {
    /// Analysis with no donor catalog (pooling groups will be empty).
    pub fn without_catalog(subject: &'a Catchment) -> Self {
        Self::new(subject, None)
    }
}

impl<'a, C: CatchmentCatalog + ?Sized> GrowthCurveAnalysis<'a, C> {
    pub fn new(subject: &'a Catchment, catalog: Option<&'a C>) -> Self {
        Self {
            subject,
            catalog,
            config: PoolingConfig::default(),
            distribution: Distribution::Glo,
            donors: None,
        }
    }

    pub fn with_config(mut self, config: PoolingConfig) -> Self {
        self.config = config;
        self.donors = None;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn subject(&self) -> &'a Catchment {
        self.subject
    }

    pub fn config(&self) -> &PoolingConfig {
        &self.config
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    /// Whether the subject is a member of its own pooling group.
    pub fn includes_subject(&self) -> bool {
        pooling::includes_subject(self.subject, &self.config)
    }

    /// Run donor selection and cache the result.
    pub fn find_donor_catchments(&mut self) -> &PoolingGroup<'a> {
        let group = match self.catalog {
            Some(catalog) => pooling::find_donor_catchments(self.subject, catalog, &self.config),
            None => {
                warn!(subject = self.subject.id, "no catalog; pooling group is empty");
                PoolingGroup::default()
            }
        };
        self.donors.insert(group)
    }

    /// The cached pooling group, if selection has run (or donors were set).
    pub fn donor_catchments(&self) -> Option<&PoolingGroup<'a>> {
        self.donors.as_ref()
    }

    /// Replace the pooling group with a hand-picked one.
    pub fn set_donors(&mut self, group: PoolingGroup<'a>) {
        self.donors = Some(group);
    }

    fn donors_or_find(&mut self) -> &PoolingGroup<'a> {
        if self.donors.is_none() {
            self.find_donor_catchments();
        }
        self.donors.get_or_insert_with(PoolingGroup::default)
    }

    /// Per-member statistics of the pooling group (selected if needed).
    pub fn pooled_statistics(&mut self) -> Result<PooledStatistics, AnalysisError> {
        let include = self.includes_subject();
        let subject = self.subject;
        let group = self.donors_or_find();
        combiner::pooled_statistics(subject, group, include)
    }

    pub fn var_and_skew(&mut self, method: GrowthCurveMethod) -> Result<LMomentRatios, AnalysisError> {
        match method {
            GrowthCurveMethod::SingleSite => combiner::single_site_var_and_skew(self.subject),
            GrowthCurveMethod::PoolingGroup => self.pooled_statistics().map(|s| s.ratios),
        }
    }

    #[tracing::instrument(skip(self), fields(subject = self.subject.id, distribution = ?self.distribution))]
    pub fn growth_curve(&mut self, method: GrowthCurveMethod) -> Result<GrowthCurve, AnalysisError> {
        let ratios = self.var_and_skew(method)?;
        let curve = GrowthCurve::fit(method, self.distribution, ratios)?;
        info!(
            l_cv = ratios.l_cv,
            l_skew = ratios.l_skew,
            location = curve.params.location,
            scale = curve.params.scale,
            shape = curve.params.shape,
            "fitted growth curve"
        );
        Ok(curve)
    }
}
