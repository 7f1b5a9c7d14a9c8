//! Order statistics helpers.

use std::cmp::Ordering;

/// Ascending copy of `values` (NaNs compare equal; callers filter them first).
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out
}

/// Sample median; the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let x = sorted(values);
    let mid = x.len() / 2;
    if x.len() % 2 == 1 {
        Some(x[mid])
    } else {
        Some((x[mid - 1] + x[mid]) / 2.0)
    }
}
