//! Index-flood standardisation of AMAX records.

use crate::domain::Catchment;

/// Valid AMAX flows divided by the catchment's own QMED, in date order.
///
/// No records (or a non-positive QMED) gives an empty vector; a single
/// record gives `[1.0]`.
pub fn dimensionless_flows(catchment: &Catchment) -> Vec<f64> {
    let flows = catchment.valid_flows();
    match crate::math::median(&flows) {
        Some(qmed) if qmed > 0.0 && qmed.is_finite() => flows.iter().map(|q| q / qmed).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AmaxRecord;
    use chrono::NaiveDate;

    fn with_flows(flows: &[f64]) -> Catchment {
        let records = flows
            .iter()
            .enumerate()
            .map(|(i, &q)| {
                AmaxRecord::new(
                    NaiveDate::from_ymd_opt(1999 + i as i32, 12, 31).unwrap(),
                    q,
                    Some(0.5),
                )
            })
            .collect();
        Catchment::new(1, "Dundee", "River Tay")
            .with_amax_records(records)
            .unwrap()
    }

    #[test]
    fn flows_are_divided_by_median() {
        let result = dimensionless_flows(&with_flows(&[3.0, 2.0, 1.0]));
        let expected = [1.5, 1.0, 0.5];
        assert_eq!(result.len(), 3);
        for (a, b) in result.iter().zip(expected) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn degenerate_records_do_not_fail() {
        assert!(dimensionless_flows(&with_flows(&[])).is_empty());
        assert_eq!(dimensionless_flows(&with_flows(&[42.0])), vec![1.0]);
        assert!(dimensionless_flows(&with_flows(&[0.0, 0.0, 0.0])).is_empty());
    }
}
