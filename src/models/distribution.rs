//! L-moment fitting and quantile functions for GLO and GEV.
//!
//! Both families share the quantile form
//!
//! `x(p) = ξ + α · (1 - exp(-k·y)) / k`      (`k → 0`: `x = ξ + α·y`)
//!
//! with a family-specific reduced variate:
//!
//! - GLO: `y = ln(p / (1 - p))`
//! - GEV: `y = -ln(-ln p)`
//!
//! Parameter estimation follows Hosking & Wallis (1997), appendix A.

use std::f64::consts::{LN_2, PI};

use statrs::function::gamma::gamma;

use crate::domain::{Distribution, DistributionParams};
use crate::error::AnalysisError;

/// Below this |k| the closed forms switch to their `k → 0` limits.
const SMALL_K: f64 = 1e-8;

/// Euler–Mascheroni constant, the `k → 0` limit of `(1 - Γ(1+k)) / k`.
const EULER: f64 = 0.577_215_664_901_532_9;

/// Bracket for the GEV shape search. `k <= -1` has infinite L2.
const GEV_K_MIN: f64 = -0.999_999;
const GEV_K_MAX: f64 = 60.0;
const GEV_BISECTION_STEPS: usize = 200;

/// Fit `distribution` to the L-moments `(l1, l2, t3)`.
pub fn fit_lmoments(
    distribution: Distribution,
    l1: f64,
    l2: f64,
    t3: f64,
) -> Result<DistributionParams, AnalysisError> {
    let infeasible = || AnalysisError::InfeasibleLMoments {
        l_cv: l2 / l1,
        l_skew: t3,
        distribution,
    };
    if !(l1.is_finite() && l2.is_finite() && t3.is_finite()) || l2 <= 0.0 || t3.abs() >= 1.0 {
        return Err(infeasible());
    }

    let params = match distribution {
        Distribution::Glo => fit_glo(l1, l2, t3),
        Distribution::Gev => fit_gev(l1, l2, t3).ok_or_else(infeasible)?,
    };

    if params.location.is_finite() && params.scale.is_finite() && params.scale > 0.0 {
        Ok(params)
    } else {
        Err(infeasible())
    }
}

/// Fit with `λ1 = 1`, then shift the location so the median growth factor is 1.
///
/// Growth curves are scaled by QMED, so `x(0.5) = 1` by construction.
pub fn fit_growth_curve(
    distribution: Distribution,
    l_cv: f64,
    l_skew: f64,
) -> Result<DistributionParams, AnalysisError> {
    let mut params = fit_lmoments(distribution, 1.0, l_cv, l_skew)?;
    params.location += 1.0 - quantile(distribution, 0.5, &params);
    Ok(params)
}

/// Quantile for non-exceedance probability `p ∈ (0, 1)`.
///
/// `p` is not validated here; see `GrowthCurve::quantile`.
pub fn quantile(distribution: Distribution, p: f64, params: &DistributionParams) -> f64 {
    let y = reduced_variate(distribution, p);
    params.location + params.scale * kappa_term(params.shape, y)
}

/// Reduced variate for `p`.
pub fn reduced_variate(distribution: Distribution, p: f64) -> f64 {
    match distribution {
        Distribution::Glo => (p / (1.0 - p)).ln(),
        Distribution::Gev => -(-p.ln()).ln(),
    }
}

/// `(1 - exp(-k·y)) / k`, with its `k → 0` limit `y`.
fn kappa_term(k: f64, y: f64) -> f64 {
    if k.abs() < SMALL_K {
        y
    } else {
        -(-k * y).exp_m1() / k
    }
}

fn fit_glo(l1: f64, l2: f64, t3: f64) -> DistributionParams {
    let k = -t3;
    if k.abs() < SMALL_K {
        return DistributionParams {
            location: l1,
            scale: l2,
            shape: 0.0,
        };
    }
    let kk = k * PI / (k * PI).sin();
    let scale = l2 / kk;
    DistributionParams {
        location: l1 - scale * (1.0 - kk) / k,
        scale,
        shape: k,
    }
}

fn fit_gev(l1: f64, l2: f64, t3: f64) -> Option<DistributionParams> {
    let k = solve_gev_shape(t3)?;
    if k.abs() < SMALL_K {
        let scale = l2 / LN_2;
        return Some(DistributionParams {
            location: l1 - scale * EULER,
            scale,
            shape: 0.0,
        });
    }
    let g = gamma(1.0 + k);
    let scale = l2 * k / ((1.0 - 2f64.powf(-k)) * g);
    Some(DistributionParams {
        location: l1 - scale * (1.0 - g) / k,
        scale,
        shape: k,
    })
}

/// GEV L-skewness as a function of the shape `k` (strictly decreasing).
fn gev_l_skew(k: f64) -> f64 {
    let ln3 = 3f64.ln();
    if k.abs() < SMALL_K {
        return 2.0 * ln3 / LN_2 - 3.0;
    }
    2.0 * (-k * ln3).exp_m1() / (-k * LN_2).exp_m1() - 3.0
}

/// Invert `gev_l_skew` by bisection.
fn solve_gev_shape(t3: f64) -> Option<f64> {
    let (mut lo, mut hi) = (GEV_K_MIN, GEV_K_MAX);
    if !(gev_l_skew(hi) < t3 && t3 < gev_l_skew(lo)) {
        return None;
    }
    for _ in 0..GEV_BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if gev_l_skew(mid) > t3 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-14 {
            break;
        }
    }
    Some(0.5 * (lo + hi))
}
