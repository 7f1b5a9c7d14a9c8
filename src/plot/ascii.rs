//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The x axis is the logistic reduced variate `ln(T - 1)` (so `T = 2` sits at
//! 0), the y axis the growth factor.
//!
//! Plot elements:
//! - observed dimensionless AMAX (Gringorten plotting positions): `o`
//! - fitted growth curve: `-` line

use crate::domain::CurveFile;
use crate::fit::GrowthCurve;
use crate::io::growth_curve_from_file;

/// Default x range: `T = 2` to `T = 1000`.
const X_MIN: f64 = 0.0;
const X_MAX: f64 = 6.906_754_778_648_554; // ln(999)

/// Render a growth curve with optional observed points.
pub fn render_ascii_plot(curve: &GrowthCurve, observed: &[f64], width: usize, height: usize) -> String {
    let points = plotting_positions(observed);
    let (x_min, x_max) = x_range(&points);
    let samples = sample_curve(curve, x_min, x_max, width.max(2));
    render_plot(&points, &samples, x_min, x_max, width, height)
}

/// Render a plot from a saved curve JSON file (curve only).
pub fn render_ascii_plot_from_curve_file(file: &CurveFile, width: usize, height: usize) -> String {
    render_ascii_plot(&growth_curve_from_file(file), &[], width, height)
}

/// Logistic reduced variate for non-exceedance probability `p`.
pub fn logistic_variate(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// `(reduced variate, value)` pairs, ascending, using Gringorten positions
/// `p_i = (i - 0.44) / (n + 0.12)`.
pub fn plotting_positions(values: &[f64]) -> Vec<(f64, f64)> {
    let sorted = crate::math::sorted(values);
    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            let p = (i as f64 + 1.0 - 0.44) / (n + 0.12);
            (logistic_variate(p), v)
        })
        .collect()
}

fn x_range(points: &[(f64, f64)]) -> (f64, f64) {
    points
        .iter()
        .fold((X_MIN, X_MAX), |(lo, hi), &(x, _)| (lo.min(x), hi.max(x)))
}

fn sample_curve(curve: &GrowthCurve, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .filter_map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            let p = 1.0 / (1.0 + (-x).exp());
            curve.quantile(p).ok().map(|y| (x, y))
        })
        .collect()
}

fn render_plot(
    points: &[(f64, f64)],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(points, curve).unwrap_or((0.0, 2.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curve first so points overlay it.
    draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);

    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: ln(T-1)=[{x_min:.3}, {x_max:.3}] | growth factor=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn y_range(points: &[(f64, f64)], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let (min_y, max_y) = points
        .iter()
        .chain(curve)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top (max).
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, '-'),
            None => grid[row][col] = '-',
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Distribution, GrowthCurveMethod};
    use crate::fit::LMomentRatios;

    fn reference_curve() -> GrowthCurve {
        GrowthCurve::fit(
            GrowthCurveMethod::PoolingGroup,
            Distribution::Glo,
            LMomentRatios {
                l_cv: 0.2232,
                l_skew: -0.0908,
            },
        )
        .unwrap()
    }

    #[test]
    fn plotting_positions_are_ascending() {
        let pts = plotting_positions(&[1.5, 0.5, 1.0]);
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[1].1, 1.0);
        // Median of three sits at p = 0.5.
        assert!(pts[1].0.abs() < 1e-12);
        assert!(pts[0].0 < pts[1].0 && pts[1].0 < pts[2].0);
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_ascii_plot(&reference_curve(), &[], 10, 5);
        let expected = concat!(
            "Plot: ln(T-1)=[0.000, 6.907] | growth factor=[0.944, 2.186]\n",
            "        --\n",
            "      --\n",
            "   ---\n",
            " --\n",
            "-\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn observed_points_extend_the_x_range() {
        let txt = render_ascii_plot(&reference_curve(), &[0.6, 0.9, 1.0, 1.1, 1.7], 30, 8);
        let header = txt.lines().next().unwrap();
        assert!(header.starts_with("Plot: ln(T-1)=[-2."), "{header}");
        let marks: usize = txt.lines().skip(1).map(|l| l.matches('o').count()).sum();
        assert_eq!(marks, 5);
        assert_eq!(txt.lines().count(), 9);
    }
}
