//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the statistics/fitting code stays clean and testable
//! - output changes are localized (snapshot tests below)

use crate::domain::{Catchment, GrowthFactor, PoolingConfig};
use crate::fit::{GrowthCurve, MemberStatistics};

/// Header block: subject, method, fitted parameters.
pub fn format_run_summary(subject: &Catchment, curve: &GrowthCurve, config: &PoolingConfig, donors: usize) -> String {
    let mut out = String::new();

    out.push_str("=== feh - FEH statistical growth curve ===\n");
    out.push_str(&format!("Subject: {}\n", subject.label()));
    out.push_str(&format!(
        "Record: {} valid AMAX | QMED={}\n",
        subject.record_length(),
        subject
            .qmed()
            .map(|q| format!("{q:.3} m3/s"))
            .unwrap_or_else(|| "n/a".to_string()),
    ));
    out.push_str(&format!(
        "Method: {} | distribution: {}\n",
        curve.method.display_name(),
        curve.distribution.display_name(),
    ));
    if curve.method == crate::domain::GrowthCurveMethod::PoolingGroup {
        out.push_str(&format!(
            "Pooling: {donors} donors | target={} station-years | urban cutoff={:.3} | subject={:?}\n",
            config.record_target, config.urban_cutoff, config.subject_inclusion,
        ));
    }
    out.push_str(&format!(
        "L-moments: L-CV={:.4} L-skew={:.4}\n",
        curve.ratios.l_cv, curve.ratios.l_skew
    ));
    out.push_str(&format!(
        "Parameters: location={:.4} scale={:.4} shape={:.4}\n",
        curve.params.location, curve.params.scale, curve.params.shape
    ));

    out
}

/// Pooling group members with their statistics and weights.
pub fn format_pooling_group(members: &[MemberStatistics]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<7} {:<28} {:>8} {:>5} {:>8} {:>8} {:>9} {:>9}",
            "id", "station", "dist", "n", "L-CV", "L-skew", "w(L-CV)", "w(L-skew)"
        ),
    );
    push_line(
        &mut out,
        format!(
            "{:-<7} {:-<28} {:-<8} {:-<5} {:-<8} {:-<8} {:-<9} {:-<9}",
            "", "", "", "", "", "", "", ""
        ),
    );

    for m in members {
        let station = format!("{} @ {}", m.watercourse, m.location);
        push_line(
            &mut out,
            format!(
                "{:<7} {:<28} {:>8.4} {:>5} {:>8.4} {:>8.4} {:>9.2} {:>9.2}",
                m.id,
                truncate(&station, 28),
                m.distance,
                m.record_length,
                m.l_cv,
                m.l_skew,
                m.l_cv_weight,
                m.l_skew_weight,
            ),
        );
    }
    let years: usize = members.iter().map(|m| m.record_length).sum();
    out.push_str(&format!("Total: {} members, {years} station-years\n", members.len()));

    out
}

/// Growth factors by return period.
pub fn format_growth_factors(table: &[GrowthFactor]) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("{:>8} {:>10} {:>8}", "T (yr)", "p", "x(T)"));
    push_line(&mut out, format!("{:->8} {:->10} {:->8}", "", "", ""));
    for row in table {
        push_line(
            &mut out,
            format!(
                "{:>8} {:>10.6} {:>8.4}",
                fmt_period(row.return_period),
                row.probability,
                row.growth_factor
            ),
        );
    }
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_period(t: f64) -> String {
    if t.fract() == 0.0 {
        format!("{t:.0}")
    } else {
        format!("{t:.2}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
