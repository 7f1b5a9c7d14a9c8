//! Shared test catchments.
//!
//! Flows follow `20 + ((i * 7) % 13) * a + (i % 5) * b`, which gives
//! reproducible, non-degenerate L-moment ratios for any `n >= 3`.
//!
//! The 37017/37020 station archives are not available here. Their published
//! pooled ratios (0.2232, -0.0908) are checked directly in
//! `models::distribution` (`glo_parameters_match_published_example`) and
//! `fit::analysis` (`glo_growth_factor_table`).

use chrono::NaiveDate;

use crate::catalog::InMemoryCatalog;
use crate::domain::{AmaxRecord, Catchment, Descriptors};

pub fn amax_series(n: usize, a: f64, b: f64) -> Vec<AmaxRecord> {
    (0..n)
        .map(|i| {
            let flow = 20.0 + ((i * 7) % 13) as f64 * a + (i % 5) as f64 * b;
            let date = NaiveDate::from_ymd_opt(1960 + i as i32, 10, 1).unwrap();
            AmaxRecord::new(date, flow, Some(1.0 + flow / 50.0))
        })
        .collect()
}

pub fn descriptors(area: f64, saar: f64, farl: f64, fpext: f64) -> Descriptors {
    Descriptors {
        dtm_area: Some(area),
        bfihost: Some(0.5),
        sprhost: Some(30.0),
        saar: Some(saar),
        farl: Some(farl),
        urbext2000: Some(0.0),
        fpext: Some(fpext),
        ..Descriptors::default()
    }
}

pub fn gauged(id: u32, descriptors: Descriptors, records: Vec<AmaxRecord>) -> Catchment {
    let mut c = Catchment::new(id, format!("Gauge {id}"), format!("River {id}"))
        .with_descriptors(descriptors)
        .with_amax_records(records)
        .unwrap();
    c.is_suitable_for_pooling = true;
    c.is_suitable_for_qmed = true;
    c
}

/// Subject with 34 years of record (L-CV 0.1157288, L-skew 0.0021803).
pub fn subject_catchment() -> Catchment {
    gauged(
        1,
        descriptors(2.345, 2000.0, 0.5, 0.2),
        amax_series(34, 1.5, 0.8),
    )
}

/// Catalog around `subject_catchment`.
///
/// | id    | role                          | records |
/// |-------|-------------------------------|---------|
/// | 10001 | donor, d = 1.3570358          | 40      |
/// | 10002 | nearest donor, d = 0.1144962  | 30      |
/// | 10003 | not suitable for pooling      | 30      |
/// | 10004 | urban (URBEXT2000 0.05)       | 30      |
/// | 10005 | record too short              | 5       |
/// | 999   | no descriptors                | 20      |
pub fn reference_catalog() -> InMemoryCatalog {
    let mut unsuitable = gauged(
        10003,
        descriptors(2.4, 2000.0, 0.5, 0.2),
        amax_series(30, 1.0, 1.0),
    );
    unsuitable.is_suitable_for_pooling = false;

    let mut urban_descriptors = descriptors(2.3, 2000.0, 0.5, 0.2);
    urban_descriptors.urbext2000 = Some(0.05);

    InMemoryCatalog::new(vec![
        gauged(
            10001,
            descriptors(5.0, 1800.0, 0.6, 0.25),
            amax_series(40, 2.0, 0.5),
        ),
        gauged(
            10002,
            descriptors(2.5, 2000.0, 0.5, 0.2),
            amax_series(30, 1.0, 2.0),
        ),
        unsuitable,
        gauged(10004, urban_descriptors, amax_series(30, 1.0, 1.0)),
        gauged(
            10005,
            descriptors(2.345, 2000.0, 0.5, 0.2),
            amax_series(5, 1.0, 1.0),
        ),
        gauged(999, Descriptors::default(), amax_series(20, 1.0, 1.0)),
    ])
    .unwrap()
}
