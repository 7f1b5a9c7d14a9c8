//! Sample L-moments.
//!
//! We use the unbiased probability-weighted-moment estimators on the ascending
//! order statistics `x_(1) <= ... <= x_(n)` (0-based index `j`):
//!
//! ```text
//! b0 = (1/n) Σ x_j
//! b1 = (1/n) Σ j/(n-1) · x_j
//! b2 = (1/n) Σ j(j-1)/((n-1)(n-2)) · x_j
//!
//! λ1 = b0
//! λ2 = 2·b1 - b0
//! λ3 = 6·b2 - 6·b1 + b0
//! ```
//!
//! Ratios: L-CV `t = λ2/λ1`, L-skewness `t3 = λ3/λ2`.

use crate::math::sorted;

/// Minimum sample size for the first three L-moments.
pub const MIN_SAMPLE_LEN: usize = 3;

/// First three sample L-moments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LMoments {
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
}

impl LMoments {
    /// L-CV (`λ2/λ1`).
    pub fn l_cv(&self) -> f64 {
        self.l2 / self.l1
    }

    /// L-skewness (`λ3/λ2`).
    pub fn l_skew(&self) -> f64 {
        self.l3 / self.l2
    }
}

/// Compute sample L-moments.
///
/// Returns `None` for fewer than `MIN_SAMPLE_LEN` values or non-finite input.
pub fn sample_lmoments(values: &[f64]) -> Option<LMoments> {
    let n = values.len();
    if n < MIN_SAMPLE_LEN || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let x = sorted(values);
    let nf = n as f64;

    let mut b0 = 0.0;
    let mut b1 = 0.0;
    let mut b2 = 0.0;
    for (j, &xj) in x.iter().enumerate() {
        let jf = j as f64;
        b0 += xj;
        b1 += jf / (nf - 1.0) * xj;
        b2 += jf * (jf - 1.0) / ((nf - 1.0) * (nf - 2.0)) * xj;
    }
    b0 /= nf;
    b1 /= nf;
    b2 /= nf;

    Some(LMoments {
        l1: b0,
        l2: 2.0 * b1 - b0,
        l3: 6.0 * b2 - 6.0 * b1 + b0,
    })
}
