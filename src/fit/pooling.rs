//! Pooling group (donor catchment) selection.
//!
//! Selection rules:
//! 1. Skip the subject itself and catchments not suitable for pooling
//! 2. Skip urbanised catchments (`URBEXT2000 >= urban_cutoff`)
//! 3. Skip catchments with fewer than `min_record_length` valid AMAX
//!    or whose L-moment ratios cannot be computed (e.g. QMED of 0)
//! 4. Rank the rest by similarity distance (ties keep catalog order)
//! 5. Take donors in rank order until the pooled station-years reach
//!    `record_target`
//!
//! Distances are kept next to each donor in the group (`Donor`), never
//! written back onto the shared catalog entities.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::catalog::CatchmentCatalog;
use crate::domain::{Catchment, PoolingConfig, SubjectInclusion};
use crate::fit::combiner::single_site_var_and_skew;
use crate::fit::similarity::similarity_distance;

/// A pooling group member with its distance to the subject.
#[derive(Debug, Clone, Copy)]
pub struct Donor<'a> {
    pub catchment: &'a Catchment,
    pub distance: f64,
}

/// Donors ranked by ascending similarity distance.
#[derive(Debug, Clone, Default)]
pub struct PoolingGroup<'a> {
    donors: Vec<Donor<'a>>,
}

impl<'a> PoolingGroup<'a> {
    /// Build a group from donors; they are re-sorted by distance (stable).
    pub fn new(mut donors: Vec<Donor<'a>>) -> Self {
        donors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Self { donors }
    }

    /// Group from catchments, computing each distance to `subject`.
    pub fn from_catchments(subject: &Catchment, catchments: &[&'a Catchment]) -> Self {
        Self::new(
            catchments
                .iter()
                .map(|&c| Donor {
                    catchment: c,
                    distance: similarity_distance(subject, c),
                })
                .collect(),
        )
    }

    pub fn donors(&self) -> &[Donor<'a>] {
        &self.donors
    }

    pub fn len(&self) -> usize {
        self.donors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donors.is_empty()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.donors.iter().map(|d| d.catchment.id).collect()
    }

    /// Distance recorded for donor `id`, if it is in the group.
    pub fn distance_of(&self, id: u32) -> Option<f64> {
        self.donors
            .iter()
            .find(|d| d.catchment.id == id)
            .map(|d| d.distance)
    }

    /// Total valid AMAX records across donors.
    pub fn record_length(&self) -> usize {
        self.donors.iter().map(|d| d.catchment.record_length()).sum()
    }
}

/// Whether the subject joins its own pooling group (as a zero-distance member).
pub fn includes_subject(subject: &Catchment, config: &PoolingConfig) -> bool {
    match config.subject_inclusion {
        SubjectInclusion::Force => true,
        SubjectInclusion::Exclude => false,
        SubjectInclusion::Auto => {
            subject.is_suitable_for_pooling
                && !subject.is_urban(config.urban_cutoff)
                && subject.record_length() >= config.min_record_length
                && single_site_var_and_skew(subject).is_ok()
        }
    }
}

/// Select donor catchments for `subject` from `catalog`.
///
/// An empty catalog, or one without comparable candidates, gives an empty
/// group rather than an error.
#[tracing::instrument(skip_all, fields(subject = subject.id))]
pub fn find_donor_catchments<'a, C>(
    subject: &Catchment,
    catalog: &'a C,
    config: &PoolingConfig,
) -> PoolingGroup<'a>
where
    C: CatchmentCatalog + ?Sized,
{
    let candidates = catalog.pooling_candidates(subject.id);
    let n_pooling = candidates.len();

    let eligible: Vec<&'a Catchment> = candidates
        .into_iter()
        .filter(|c| !c.is_urban(config.urban_cutoff))
        .filter(|c| c.record_length() >= config.min_record_length)
        .collect();
    debug!(
        catalog = catalog.len(),
        suitable = n_pooling,
        eligible = eligible.len(),
        "filtered donor candidates"
    );

    // Distances and statistics checks are pure; compute them in parallel, then
    // rank sequentially so ties keep catalog order.
    let scored: Vec<(f64, bool)> = eligible
        .par_iter()
        .map(|c| (similarity_distance(subject, c), single_site_var_and_skew(c).is_ok()))
        .collect();
    let degenerate = scored.iter().filter(|(_, ok)| !ok).count();
    if degenerate > 0 {
        debug!(degenerate, "skipped candidates without computable L-moments");
    }
    let mut ranked: Vec<Donor<'a>> = eligible
        .into_iter()
        .zip(scored)
        .filter(|(_, (d, ok))| *ok && d.is_finite())
        .map(|(catchment, (distance, _))| Donor { catchment, distance })
        .collect();
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut pooled_years = if includes_subject(subject, config) {
        subject.record_length()
    } else {
        0
    };
    let mut donors = Vec::new();
    for donor in ranked {
        if pooled_years >= config.record_target {
            break;
        }
        pooled_years += donor.catchment.record_length();
        donors.push(donor);
    }

    info!(
        donors = donors.len(),
        station_years = pooled_years,
        target = config.record_target,
        "selected pooling group"
    );
    PoolingGroup { donors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::fixtures::{reference_catalog, subject_catchment};

    #[test]
    fn donors_ranked_by_similarity() {
        let catalog = reference_catalog();
        let group = find_donor_catchments(&subject_catchment(), &catalog, &PoolingConfig::default());
        assert_eq!(group.ids(), vec![10002, 10001]);
        let d: Vec<f64> = group.donors().iter().map(|d| d.distance).collect();
        assert!(d.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn subject_unsuitable_and_urban_are_never_donors() {
        let catalog = reference_catalog();
        let subject = catalog.get(10002).unwrap().clone();
        let group = find_donor_catchments(&subject, &catalog, &PoolingConfig::default());
        let ids = group.ids();
        assert!(!ids.contains(&10002), "subject in its own donor list");
        assert!(!ids.contains(&10003), "unsuitable catchment selected");
        assert!(!ids.contains(&10004), "urban catchment selected");
        assert!(!ids.contains(&10005), "short record selected");
        assert!(!ids.contains(&999), "incomparable catchment selected");
    }

    #[test]
    fn stops_once_record_target_is_met() {
        let catalog = reference_catalog();
        let mut config = PoolingConfig {
            record_target: 30,
            subject_inclusion: SubjectInclusion::Exclude,
            ..PoolingConfig::default()
        };
        let subject = subject_catchment();
        assert_eq!(find_donor_catchments(&subject, &catalog, &config).ids(), vec![10002]);

        config.record_target = 31;
        assert_eq!(
            find_donor_catchments(&subject, &catalog, &config).ids(),
            vec![10002, 10001]
        );
    }

    #[test]
    fn subject_record_counts_towards_target_when_included() {
        let catalog = reference_catalog();
        // The reference subject has 34 valid records.
        let subject = subject_catchment();
        let config = PoolingConfig {
            record_target: 50,
            subject_inclusion: SubjectInclusion::Force,
            ..PoolingConfig::default()
        };
        assert_eq!(find_donor_catchments(&subject, &catalog, &config).ids(), vec![10002]);
    }

    #[test]
    fn candidates_without_statistics_are_skipped() {
        let mut records = crate::fixtures::amax_series(12, 1.0, 1.0);
        for r in records.iter_mut().take(8) {
            r.flow = 0.0;
        }
        let ephemeral = crate::fixtures::gauged(10009, crate::fixtures::descriptors(2.345, 2000.0, 0.5, 0.2), records);
        assert!(single_site_var_and_skew(&ephemeral).is_err());

        let mut catchments = reference_catalog().into_inner();
        catchments.push(ephemeral);
        let catalog = InMemoryCatalog::new(catchments).unwrap();
        let subject = subject_catchment();
        let group = find_donor_catchments(&subject, &catalog, &PoolingConfig::default());
        assert_eq!(group.ids(), vec![10002, 10001]);

        let stats = crate::fit::pooled_statistics(&subject, &group, true).unwrap();
        assert_eq!(stats.members.len(), 3);
    }

    #[test]
    fn empty_catalog_gives_empty_group() {
        let catalog = InMemoryCatalog::default();
        let group = find_donor_catchments(&subject_catchment(), &catalog, &PoolingConfig::default());
        assert!(group.is_empty());
        assert_eq!(group.record_length(), 0);
    }

    #[test]
    fn incomparable_candidates_give_empty_group() {
        let mut other = Catchment::new(999, "Burn A", "Village B");
        other.is_suitable_for_pooling = true;
        other.amax_records = crate::fixtures::amax_series(20, 1.0, 1.0);
        let catalog = vec![other];
        let group = find_donor_catchments(&subject_catchment(), &catalog, &PoolingConfig::default());
        assert!(group.is_empty());
    }

    #[test]
    fn auto_inclusion_follows_donor_rules() {
        let config = PoolingConfig::default();
        let mut subject = subject_catchment();
        assert!(includes_subject(&subject, &config));

        subject.descriptors.urbext2000 = Some(0.031);
        assert!(!includes_subject(&subject, &config));

        subject.descriptors.urbext2000 = Some(0.0);
        subject.is_suitable_for_pooling = false;
        assert!(!includes_subject(&subject, &config));

        let forced = PoolingConfig {
            subject_inclusion: SubjectInclusion::Force,
            ..config.clone()
        };
        assert!(includes_subject(&subject, &forced));
    }

    #[test]
    fn manual_group_is_sorted_and_keeps_distances() {
        let catalog = reference_catalog();
        let subject = subject_catchment();
        let far = catalog.get(10001).unwrap();
        let near = catalog.get(10002).unwrap();
        let group = PoolingGroup::from_catchments(&subject, &[far, near]);
        assert_eq!(group.ids(), vec![10002, 10001]);
        assert!(group.distance_of(10001).unwrap() > group.distance_of(10002).unwrap());
        assert!(group.distance_of(1).is_none());
    }
}
