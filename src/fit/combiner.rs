//! Weighted combination of L-moment ratios across a pooling group.
//!
//! Each member contributes its own L-CV and L-skewness. Weights grow with
//! record length and shrink with similarity distance (Science Report
//! SC050050, eqns 6.18/6.22a for L-CV and 6.19/6.23a for L-skewness).

use serde::Serialize;
use tracing::debug;

use crate::domain::Catchment;
use crate::error::AnalysisError;
use crate::fit::normalize::dimensionless_flows;
use crate::fit::pooling::PoolingGroup;
use crate::math::{MIN_SAMPLE_LEN, sample_lmoments};

/// L-CV (`t2 = l2/l1`) and L-skewness (`t3 = l3/l2`) of a dimensionless sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LMomentRatios {
    pub l_cv: f64,
    pub l_skew: f64,
}

/// Which statistics to produce.
#[derive(Debug, Clone, Copy)]
pub enum CombineTarget<'a> {
    SingleSite(&'a Catchment),
    PoolingGroup {
        subject: &'a Catchment,
        group: &'a PoolingGroup<'a>,
        include_subject: bool,
    },
}

/// A pooling group member's statistics and weights.
#[derive(Debug, Clone, Serialize)]
pub struct MemberStatistics {
    pub id: u32,
    pub location: String,
    pub watercourse: String,
    pub distance: f64,
    pub record_length: usize,
    pub l_cv: f64,
    pub l_skew: f64,
    pub l_cv_weight: f64,
    pub l_skew_weight: f64,
}

/// Per-member breakdown plus the combined ratios.
#[derive(Debug, Clone)]
pub struct PooledStatistics {
    pub members: Vec<MemberStatistics>,
    pub ratios: LMomentRatios,
}

/// L-CV weight for a member with `n` years of record at distance `d`.
pub fn l_cv_weight(n: usize, d: f64) -> f64 {
    let b = 0.0047 * d.sqrt();
    let c = 0.0023 / 2.0;
    let var = 0.02609 / (n as f64 - 1.0);
    1.0 / (b + c + var)
}

/// L-skewness weight for a member with `n` years of record at distance `d`.
pub fn l_skew_weight(n: usize, d: f64) -> f64 {
    let b = 0.0219 * (1.0 - (-d / 0.2360).exp());
    let var = 0.2743 / (n as f64 - 2.0);
    1.0 / (b + var)
}

pub fn var_and_skew(target: CombineTarget<'_>) -> Result<LMomentRatios, AnalysisError> {
    match target {
        CombineTarget::SingleSite(catchment) => single_site_var_and_skew(catchment),
        CombineTarget::PoolingGroup {
            subject,
            group,
            include_subject,
        } => pooled_var_and_skew(subject, group, include_subject),
    }
}

/// Sample L-CV and L-skewness of the catchment's own dimensionless flows.
pub fn single_site_var_and_skew(catchment: &Catchment) -> Result<LMomentRatios, AnalysisError> {
    let got = catchment.record_length();
    if got < MIN_SAMPLE_LEN {
        return Err(AnalysisError::TooFewRecords {
            id: catchment.id,
            got,
            min: MIN_SAMPLE_LEN,
        });
    }
    let degenerate = || AnalysisError::DegenerateSample { id: catchment.id };
    let lm = sample_lmoments(&dimensionless_flows(catchment)).ok_or_else(degenerate)?;
    if !(lm.l2 > 0.0 && lm.l1 > 0.0) {
        return Err(degenerate());
    }
    Ok(LMomentRatios {
        l_cv: lm.l_cv(),
        l_skew: lm.l_skew(),
    })
}

pub fn pooled_var_and_skew(
    subject: &Catchment,
    group: &PoolingGroup<'_>,
    include_subject: bool,
) -> Result<LMomentRatios, AnalysisError> {
    pooled_statistics(subject, group, include_subject).map(|s| s.ratios)
}

/// Member-by-member statistics and their weighted averages.
///
/// With `include_subject` the subject is the first member, at distance 0.
pub fn pooled_statistics(
    subject: &Catchment,
    group: &PoolingGroup<'_>,
    include_subject: bool,
) -> Result<PooledStatistics, AnalysisError> {
    let mut members = Vec::with_capacity(group.len() + 1);
    if include_subject {
        members.push(member_statistics(subject, 0.0)?);
    }
    for donor in group.donors() {
        members.push(member_statistics(donor.catchment, donor.distance)?);
    }
    if members.is_empty() {
        return Err(AnalysisError::EmptyPoolingGroup);
    }

    let ratios = LMomentRatios {
        l_cv: weighted_mean(members.iter().map(|m| (m.l_cv_weight, m.l_cv))),
        l_skew: weighted_mean(members.iter().map(|m| (m.l_skew_weight, m.l_skew))),
    };
    debug!(
        members = members.len(),
        l_cv = ratios.l_cv,
        l_skew = ratios.l_skew,
        "combined pooling group L-moments"
    );
    Ok(PooledStatistics { members, ratios })
}

fn member_statistics(catchment: &Catchment, distance: f64) -> Result<MemberStatistics, AnalysisError> {
    let ratios = single_site_var_and_skew(catchment)?;
    let n = catchment.record_length();
    Ok(MemberStatistics {
        id: catchment.id,
        location: catchment.location.clone(),
        watercourse: catchment.watercourse.clone(),
        distance,
        record_length: n,
        l_cv: ratios.l_cv,
        l_skew: ratios.l_skew,
        l_cv_weight: l_cv_weight(n, distance),
        l_skew_weight: l_skew_weight(n, distance),
    })
}

fn weighted_mean(pairs: impl Iterator<Item = (f64, f64)>) -> f64 {
    let (num, den) = pairs.fold((0.0, 0.0), |(num, den), (w, s)| (num + w * s, den + w));
    num / den
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatchmentCatalog;
    use crate::fixtures::{amax_series, gauged, reference_catalog, subject_catchment};
    use crate::domain::{AmaxFlag, AmaxRecord, Descriptors};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn with_flows(flows: &[f64]) -> Catchment {
        let records = flows
            .iter()
            .enumerate()
            .map(|(i, &q)| {
                AmaxRecord::new(NaiveDate::from_ymd_opt(1980 + i as i32, 1, 15).unwrap(), q, None)
            })
            .collect();
        gauged(7, Descriptors::default(), records)
    }

    #[test]
    fn weights_match_reference_values() {
        assert!(close(l_cv_weight(34, 0.0), 515.30, 0.05));
        assert!(close(l_skew_weight(34, 0.0), 116.66, 0.05));
        assert!(close(l_cv_weight(34, 0.2010), 247.06, 0.05));
        assert!(close(l_skew_weight(34, 0.2010), 47.34, 0.05));
    }

    #[test]
    fn single_site_ratios() {
        let r = single_site_var_and_skew(&with_flows(&[3.0, 2.0, 1.0])).unwrap();
        assert!(close(r.l_cv, 1.0 / 3.0, 1e-12));
        assert!(close(r.l_skew, 0.0, 1e-12));

        let r = single_site_var_and_skew(&with_flows(&[10.0, 12.0, 15.0, 11.0, 30.0])).unwrap();
        assert!(close(r.l_cv, 0.282_051_282, 1e-9));
        assert!(close(r.l_skew, 0.681_818_182, 1e-9));

        let r = single_site_var_and_skew(&subject_catchment()).unwrap();
        assert!(close(r.l_cv, 0.115_728_771_94, 1e-10));
        assert!(close(r.l_skew, 0.002_180_343_75, 1e-10));
    }

    #[test]
    fn rejected_records_are_ignored() {
        let mut c = with_flows(&[3.0, 2.0, 1.0, 500.0]);
        c.amax_records[3].flag = AmaxFlag::Rejected;
        let r = single_site_var_and_skew(&c).unwrap();
        assert!(close(r.l_cv, 1.0 / 3.0, 1e-12));
    }

    #[test]
    fn short_and_flat_records_are_errors() {
        assert_eq!(
            single_site_var_and_skew(&with_flows(&[1.0, 2.0])).unwrap_err(),
            AnalysisError::TooFewRecords { id: 7, got: 2, min: 3 }
        );
        assert_eq!(
            single_site_var_and_skew(&with_flows(&[5.0, 5.0, 5.0])).unwrap_err(),
            AnalysisError::DegenerateSample { id: 7 }
        );
        assert_eq!(
            single_site_var_and_skew(&with_flows(&[0.0, 0.0, 0.0])).unwrap_err(),
            AnalysisError::DegenerateSample { id: 7 }
        );
    }

    #[test]
    fn pooled_ratios_weight_every_member() {
        let catalog = reference_catalog();
        let subject = subject_catchment();
        let group = PoolingGroup::from_catchments(
            &subject,
            &[catalog.get(10001).unwrap(), catalog.get(10002).unwrap()],
        );

        let stats = pooled_statistics(&subject, &group, true).unwrap();
        let ids: Vec<u32> = stats.members.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 10002, 10001]);
        assert_eq!(stats.members[0].distance, 0.0);
        assert!(close(stats.ratios.l_cv, 0.113_632_510_634, 1e-9));
        assert!(close(stats.ratios.l_skew, 0.005_625_231_674, 1e-9));

        let excluded = pooled_var_and_skew(&subject, &group, false).unwrap();
        assert!(close(excluded.l_cv, 0.111_009_508_981, 1e-9));
        assert!(close(excluded.l_skew, 0.010_124_310_688, 1e-9));
    }

    #[test]
    fn subject_alone_equals_single_site() {
        let subject = subject_catchment();
        let empty = PoolingGroup::default();
        let pooled = var_and_skew(CombineTarget::PoolingGroup {
            subject: &subject,
            group: &empty,
            include_subject: true,
        })
        .unwrap();
        let single = var_and_skew(CombineTarget::SingleSite(&subject)).unwrap();
        assert!(close(pooled.l_cv, single.l_cv, 1e-15));
        assert!(close(pooled.l_skew, single.l_skew, 1e-15));
    }

    #[test]
    fn no_members_is_an_error() {
        let subject = subject_catchment();
        let err = pooled_var_and_skew(&subject, &PoolingGroup::default(), false).unwrap_err();
        assert_eq!(err, AnalysisError::EmptyPoolingGroup);
    }

    #[test]
    fn short_donor_fails_the_combination() {
        let subject = subject_catchment();
        let short = gauged(42, subject.descriptors.clone(), amax_series(2, 1.0, 1.0));
        let group = PoolingGroup::from_catchments(&subject, &[&short]);
        assert!(matches!(
            pooled_var_and_skew(&subject, &group, true),
            Err(AnalysisError::TooFewRecords { id: 42, .. })
        ));
    }

    proptest! {
        #[test]
        fn weights_fall_with_distance(n in 3usize..200, d in 0.0f64..5.0, step in 0.001f64..1.0) {
            prop_assert!(l_cv_weight(n, d + step) < l_cv_weight(n, d));
            prop_assert!(l_skew_weight(n, d + step) < l_skew_weight(n, d));
        }

        #[test]
        fn weights_grow_with_record_length(n in 3usize..200, d in 0.0f64..5.0) {
            prop_assert!(l_cv_weight(n + 1, d) > l_cv_weight(n, d));
            prop_assert!(l_skew_weight(n + 1, d) > l_skew_weight(n, d));
        }

        #[test]
        fn pooled_ratios_lie_within_member_range(include in any::<bool>()) {
            let catalog = reference_catalog();
            let subject = subject_catchment();
            let group = PoolingGroup::from_catchments(
                &subject,
                &[catalog.get(10001).unwrap(), catalog.get(10002).unwrap()],
            );
            let stats = pooled_statistics(&subject, &group, include).unwrap();
            let lo = stats.members.iter().map(|m| m.l_cv).fold(f64::INFINITY, f64::min);
            let hi = stats.members.iter().map(|m| m.l_cv).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(lo <= stats.ratios.l_cv && stats.ratios.l_cv <= hi);
        }
    }
}
