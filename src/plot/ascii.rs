//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - data points: `o`
//! - connecting line (line plots only): `-`
//! - horizontal bars: `#`

use crate::domain::YearMonth;
use crate::report::truncate;
use crate::stats::{AggregateTable, CostPoint};

const MAX_LABEL_WIDTH: usize = 24;

/// Points joined left to right by a line.
pub fn render_line_plot(points: &[(f64, f64)], width: usize, height: usize, caption: &str) -> String {
    render_xy(points, true, width, height, caption)
}

/// Unconnected points.
pub fn render_scatter_plot(points: &[(f64, f64)], width: usize, height: usize, caption: &str) -> String {
    render_xy(points, false, width, height, caption)
}

/// Trips per month as a line plot over month index.
pub fn render_monthly_plot(
    table: &AggregateTable<YearMonth, usize>,
    width: usize,
    height: usize,
) -> String {
    let points: Vec<(f64, f64)> = table
        .values()
        .enumerate()
        .map(|(i, &count)| (i as f64, count as f64))
        .collect();
    let caption = match (table.rows.first(), table.rows.last()) {
        (Some((first, _)), Some((last, _))) => format!("Months {first}..{last}"),
        _ => "Months".to_string(),
    };
    render_line_plot(&points, width, height, &caption)
}

/// Total cost against duration.
pub fn render_cost_duration_plot(points: &[CostPoint], width: usize, height: usize) -> String {
    let xy: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.duration_days as f64, p.total_cost))
        .collect();
    render_scatter_plot(&xy, width, height, "Duration (days) vs total cost")
}

/// One horizontal bar per row, scaled to the largest value.
pub fn render_bar_chart<F>(rows: &[(String, f64)], width: usize, fmt_value: F) -> String
where
    F: Fn(f64) -> String,
{
    let labels: Vec<String> = rows.iter().map(|(k, _)| truncate(k, MAX_LABEL_WIDTH)).collect();
    let values: Vec<String> = rows.iter().map(|&(_, v)| fmt_value(v)).collect();

    let label_w = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let value_w = values.iter().map(|v| v.chars().count()).max().unwrap_or(0);
    let bar_w = width.saturating_sub(label_w + value_w + 3).max(10);

    let max = rows.iter().map(|&(_, v)| v).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for ((label, value), &(_, v)) in labels.iter().zip(&values).zip(rows) {
        let len = if max > 0.0 {
            ((v.max(0.0) / max) * bar_w as f64).round() as usize
        } else {
            0
        };
        let bar = "#".repeat(len.min(bar_w));
        out.push_str(&format!("{label:<label_w$} |{bar:<bar_w$} {value:>value_w$}\n"));
    }
    out
}

fn render_xy(points: &[(f64, f64)], connect: bool, width: usize, height: usize, caption: &str) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = widen(range(points.iter().map(|p| p.0)).unwrap_or((0.0, 1.0)));
    let (y_min, y_max) = widen(range(points.iter().map(|p| p.1)).unwrap_or((0.0, 1.0)));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Line first so points overlay it.
    if connect {
        let mut prev = None;
        for &(x, y) in points {
            let cx = map_x(x, x_min, x_max, width);
            let cy = map_y(y, y_min, y_max, height);
            if let Some((x0, y0)) = prev {
                draw_line(&mut grid, x0, y0, cx, cy, '-');
            }
            prev = Some((cx, cy));
        }
    }

    for &(x, y) in points {
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        grid[cy][cx] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{caption}: x=[{x_min:.2}, {x_max:.2}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

/// A degenerate range becomes one unit wide around its value.
fn widen((min, max): (f64, f64)) -> (f64, f64) {
    if max > min { (min, max) } else { (min - 0.5, max + 0.5) }
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
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
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

    #[test]
    fn line_plot_golden_snapshot_small() {
        let txt = render_line_plot(&[(0.0, 0.0), (1.0, 10.0)], 10, 5, "Trips");
        let expected = concat!(
            "Trips: x=[0.00, 1.00] | y=[-0.50, 10.50]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn scatter_plot_has_no_line() {
        let txt = render_scatter_plot(&[(0.0, 0.0), (1.0, 10.0)], 10, 5, "Spend");
        assert!(!txt.contains("--"));
        assert_eq!(txt.matches('o').count(), 2);
    }

    #[test]
    fn empty_plot_is_blank_grid() {
        let txt = render_line_plot(&[], 10, 5, "Trips");
        assert_eq!(txt.lines().count(), 6);
        assert!(!txt.contains('o'));
    }

    #[test]
    fn bar_chart_golden_snapshot() {
        let rows = vec![("Bus".to_string(), 2.0), ("Airplane".to_string(), 4.0)];
        let txt = render_bar_chart(&rows, 30, |v| format!("{v:.0}"));
        let expected = format!(
            "Bus      |{}{}2\nAirplane |{} 4\n",
            "#".repeat(9),
            " ".repeat(10),
            "#".repeat(18),
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn monthly_plot_caption_names_months() {
        let table = AggregateTable::new(vec![
            (YearMonth { year: 2023, month: 1 }, 2),
            (YearMonth { year: 2023, month: 3 }, 1),
        ]);
        let txt = render_monthly_plot(&table, 20, 5);
        assert!(txt.starts_with("Months 2023-01..2023-03: "));
    }
}
