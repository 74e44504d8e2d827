//! Terminal plotting.

pub mod ascii;

pub use ascii::{
    render_bar_chart, render_cost_duration_plot, render_line_plot, render_monthly_plot,
    render_scatter_plot,
};
