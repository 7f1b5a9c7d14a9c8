//! Hydrological similarity distance between two catchments.
//!
//! Science Report SC050050, eqn 6.2:
//!
//! ```text
//! d = sqrt( 3.2 · ln(AREA_i / AREA_j)²
//!         + 0.5 · ln(SAAR_i / SAAR_j)²
//!         + 0.1 · (FARL_i - FARL_j)²
//!         + 0.2 · (FPEXT_i - FPEXT_j)² )
//! ```
//!
//! A missing descriptor on either side makes the pair incomparable, which is
//! encoded as `f64::INFINITY` so the candidate sorts last and is never selected.

use crate::domain::{Catchment, Descriptor, Descriptors};

/// How a descriptor difference enters the distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// `ln(a / b)`; both values must be positive.
    Log,
    /// `a - b`.
    Linear,
}

/// One weighted dimension of the distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityTerm {
    pub descriptor: Descriptor,
    pub weight: f64,
    pub transform: Transform,
}

/// FEH pooling-group similarity dimensions.
pub const FEH_SIMILARITY_TERMS: [SimilarityTerm; 4] = [
    SimilarityTerm {
        descriptor: Descriptor::DtmArea,
        weight: 3.2,
        transform: Transform::Log,
    },
    SimilarityTerm {
        descriptor: Descriptor::Saar,
        weight: 0.5,
        transform: Transform::Log,
    },
    SimilarityTerm {
        descriptor: Descriptor::Farl,
        weight: 0.1,
        transform: Transform::Linear,
    },
    SimilarityTerm {
        descriptor: Descriptor::Fpext,
        weight: 0.2,
        transform: Transform::Linear,
    },
];

/// Similarity distance between `subject` and `candidate` (FEH terms).
pub fn similarity_distance(subject: &Catchment, candidate: &Catchment) -> f64 {
    weighted_distance(
        &FEH_SIMILARITY_TERMS,
        &subject.descriptors,
        &candidate.descriptors,
    )
}

/// Weighted Euclidean distance over `terms`; `INFINITY` when incomparable.
pub fn weighted_distance(terms: &[SimilarityTerm], a: &Descriptors, b: &Descriptors) -> f64 {
    let mut sum = 0.0;
    for term in terms {
        let (Some(x), Some(y)) = (a.get(term.descriptor), b.get(term.descriptor)) else {
            return f64::INFINITY;
        };
        let delta = match term.transform {
            Transform::Log => {
                if !(x > 0.0 && y > 0.0) {
                    return f64::INFINITY;
                }
                // Difference of logs keeps the distance bit-symmetric.
                x.ln() - y.ln()
            }
            Transform::Linear => x - y,
        };
        if !delta.is_finite() {
            return f64::INFINITY;
        }
        sum += term.weight * delta * delta;
    }
    sum.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catchment(area: f64, saar: f64, farl: f64, fpext: f64) -> Catchment {
        Catchment::new(1, "Here", "River").with_descriptors(Descriptors {
            dtm_area: Some(area),
            saar: Some(saar),
            farl: Some(farl),
            fpext: Some(fpext),
            ..Descriptors::default()
        })
    }

    #[test]
    fn same_catchment_is_zero() {
        let c = catchment(2.345, 2000.0, 0.5, 0.2);
        assert_eq!(similarity_distance(&c, &c), 0.0);
    }

    #[test]
    fn distance_matches_hand_calculation() {
        let a = catchment(100.0, 800.0, 0.95, 0.05);
        let b = catchment(150.0, 1000.0, 0.90, 0.10);
        let d = similarity_distance(&a, &b);
        assert!((d - 0.742_787_166_491_646).abs() < 1e-12, "got {d}");
        assert_eq!(d, similarity_distance(&b, &a));
    }

    #[test]
    fn argument_order_does_not_change_distance() {
        let a = catchment(2.345, 2000.0, 0.5, 0.2);
        for b in [
            catchment(5.0, 1800.0, 0.6, 0.25),
            catchment(2.5, 2000.0, 0.5, 0.2),
            catchment(0.37, 611.0, 0.83, 0.013),
        ] {
            assert_eq!(similarity_distance(&a, &b).to_bits(), similarity_distance(&b, &a).to_bits());
        }
    }

    #[test]
    fn missing_descriptor_is_incomparable() {
        let full = catchment(100.0, 800.0, 0.95, 0.05);
        let mut partial = full.clone();
        partial.descriptors.fpext = None;
        assert_eq!(similarity_distance(&full, &partial), f64::INFINITY);
        assert_eq!(similarity_distance(&partial, &full), f64::INFINITY);

        let empty = Catchment::new(999, "Burn A", "Village B");
        assert_eq!(similarity_distance(&full, &empty), f64::INFINITY);
    }

    #[test]
    fn non_positive_log_descriptor_is_incomparable() {
        let a = catchment(100.0, 800.0, 0.95, 0.05);
        let b = catchment(0.0, 800.0, 0.95, 0.05);
        assert_eq!(similarity_distance(&a, &b), f64::INFINITY);
    }

    #[test]
    fn unused_descriptors_do_not_matter() {
        let a = catchment(100.0, 800.0, 0.95, 0.05);
        let mut b = a.clone();
        b.descriptors.bfihost = Some(0.9);
        b.descriptors.urbext2000 = None;
        assert_eq!(similarity_distance(&a, &b), 0.0);
    }
}
