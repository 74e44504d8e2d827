//! Plotters-powered line/scatter chart widget for Ratatui.
//!
//! Ratatui's `BarChart` covers the categorical panels; the monthly trend line
//! and the cost/duration scatter are drawn with Plotters instead, rendered into
//! the Ratatui buffer through `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description.
///
/// All series and bounds are computed outside the render call so `render()`
/// only draws.
pub struct TravelChart<'a> {
    /// Points joined by a line (monthly trend).
    pub line: &'a [(f64, f64)],
    /// Unconnected points (scatter, or markers on the line).
    pub points: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: &'a dyn Fn(f64) -> String,
    pub fmt_y: &'a dyn Fn(f64) -> String,
}

impl<'a> TravelChart<'a> {
    /// Bounds covering `series`, padded by 5% on y.
    pub fn bounds_for(series: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
        let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in series {
            x0 = x0.min(x);
            x1 = x1.max(x);
            y0 = y0.min(y);
            y1 = y1.max(y);
        }
        if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
            let mid = if x0.is_finite() { x0 } else { 0.0 };
            x0 = mid - 0.5;
            x1 = mid + 0.5;
        }
        if !y0.is_finite() || !y1.is_finite() || y1 <= y0 {
            let mid = if y0.is_finite() { y0 } else { 0.0 };
            y0 = mid - 0.5;
            y1 = mid + 0.5;
        }
        let pad = ((y1 - y0).abs() * 0.05).max(1e-12);
        ([x0, x1], [y0 - pad, y1 + pad])
    }
}

impl<'a> Widget for TravelChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan
            let points_color = RGBColor(255, 200, 0); // amber

            if self.line.len() >= 2 {
                chart.draw_series(LineSeries::new(self.line.iter().copied(), &line_color))?;
            }

            // `Circle` radii are mis-scaled by the backend; a `Pixel` renders as a clean dot.
            chart.draw_series(
                self.points
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), points_color)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_pad_y_and_keep_x() {
        let (x, y) = TravelChart::bounds_for(&[(1.0, 10.0), (3.0, 30.0)]);
        assert_eq!(x, [1.0, 3.0]);
        assert!((y[0] - 9.0).abs() < 1e-9);
        assert!((y[1] - 31.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_bounds_are_widened() {
        let (x, y) = TravelChart::bounds_for(&[(2.0, 5.0)]);
        assert_eq!(x, [1.5, 2.5]);
        assert!(y[0] < 5.0 && y[1] > 5.0);

        let (x, _) = TravelChart::bounds_for(&[]);
        assert_eq!(x, [-0.5, 0.5]);
    }

    #[test]
    fn tiny_area_renders_hint() {
        let fmt = |v: f64| format!("{v:.0}");
        let chart = TravelChart {
            line: &[],
            points: &[],
            x_bounds: [0.0, 1.0],
            y_bounds: [0.0, 1.0],
            x_label: "x",
            y_label: "y",
            fmt_x: &fmt,
            fmt_y: &fmt,
        };
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
        let first_row: String = (0..40).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(first_row.starts_with("Chart area too small"));
    }
}
