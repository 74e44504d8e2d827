//! Ratatui-based terminal dashboard.
//!
//! The dashboard shows the four pages as tabs, a sidebar with the filter
//! widgets and key metrics, and the current page's panels. Every key press
//! that changes a filter or the page re-runs the pipeline in full.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
};
use tracing::info;

use crate::app::pipeline::{self, RunOutput};
use crate::domain::{Dataset, NavigationState};
use crate::error::AppError;
use crate::report::{format_amount, no_data_message, truncate};
use crate::views::{Panel, PanelData};

mod filters;
mod plotters_chart;

pub use filters::{FilterField, FilterState};
use plotters_chart::TravelChart;

const ABOUT: &str = "Travel analytics studies trends, patterns and behaviors to better \
understand how people travel. Use the filters on the left to narrow the records by year, \
destination and mode of transport; every page updates from the same filtered view.";

/// Start the dashboard over an already loaded dataset.
pub fn run(dataset: &'static Dataset, filters: FilterState) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dataset, filters)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    dataset: &'static Dataset,
    filters: FilterState,
    navigation: NavigationState,
    status: String,
    run: Option<RunOutput<'static>>,
}

impl App {
    fn new(dataset: &'static Dataset, filters: FilterState) -> Result<Self, AppError> {
        let mut app = Self {
            dataset,
            filters,
            navigation: NavigationState::Overview,
            status: String::new(),
            run: None,
        };
        app.refresh()?;
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.navigate(NavigationState::ALL[index])?;
            }
            KeyCode::Tab => self.navigate(self.navigation.next())?,
            KeyCode::BackTab => self.navigate(self.navigation.prev())?,
            KeyCode::Up => self.filters.select_prev(),
            KeyCode::Down => self.filters.select_next(),
            KeyCode::Left => {
                self.filters.adjust(-1);
                self.refresh()?;
            }
            KeyCode::Right => {
                self.filters.adjust(1);
                self.refresh()?;
            }
            KeyCode::Char(' ') if self.filters.selected == FilterField::Transport => {
                self.filters.toggle();
                self.refresh()?;
            }
            KeyCode::Char('a') => {
                self.filters.reset();
                self.refresh()?;
            }
            _ => {}
        }
        Ok(false)
    }

    fn navigate(&mut self, navigation: NavigationState) -> Result<(), AppError> {
        if navigation != self.navigation {
            info!(action = "navigate", component = "tui", view = navigation.display_name(), "Page changed");
            self.navigation = navigation;
            self.refresh()?;
        }
        Ok(())
    }

    /// Re-run the pipeline for the current filters and page.
    fn refresh(&mut self) -> Result<(), AppError> {
        let criteria = pipeline::build_criteria(self.dataset, &self.filters.to_input())?;
        let run = pipeline::run_view(self.dataset, criteria, self.navigation);
        self.status = format!("{} of {} records", run.view.len(), self.dataset.len());
        self.run = Some(run);
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = NavigationState::ALL
            .iter()
            .enumerate()
            .map(|(i, nav)| Line::from(format!("{} {}", i + 1, nav.display_name())))
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.navigation.index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled("Travel Pattern Analysis", Style::default().fg(Color::Cyan))),
            )
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(0)])
            .split(area);

        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(chunks[0]);

        self.draw_filters(frame, sidebar[0]);
        self.draw_metrics(frame, sidebar[1]);
        self.draw_page(frame, chunks[1]);
    }

    fn draw_filters(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self.filters.rows().into_iter().map(ListItem::new).collect();

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.filters.selected.index()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_metrics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Key Metrics").borders(Borders::ALL);
        let Some(run) = &self.run else {
            frame.render_widget(block, area);
            return;
        };

        let m = &run.metrics;
        let label = Style::default().fg(Color::Gray);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(Span::styled("Most Traveled Destination", label)),
            Line::from(Span::styled(m.most_traveled_destination.to_string(), value)),
            Line::from(Span::styled("Most Used Transportation", label)),
            Line::from(Span::styled(m.most_used_transportation.to_string(), value)),
            Line::from(Span::styled("Avg. Accommodation Cost", label)),
            Line::from(Span::styled(format_amount(&m.avg_accommodation_cost), value)),
            Line::from(Span::styled("Avg. Transportation Cost", label)),
            Line::from(Span::styled(format_amount(&m.avg_transportation_cost), value)),
        ];
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_page(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        };

        if self.navigation == NavigationState::Overview {
            self.draw_overview(frame, area);
            return;
        }

        let panels: Vec<&Panel> = run.report.panels.iter().filter(|p| !p.data.is_scalar()).collect();
        if panels.is_empty() {
            return;
        }
        let constraints = vec![Constraint::Ratio(1, panels.len() as u32); panels.len()];
        let rects = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (panel, rect) in panels.into_iter().zip(rects.iter()) {
            draw_panel(frame, *rect, panel);
        }
    }

    fn draw_overview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = vec![
            Line::from(Span::styled(
                "Exploring Travel Patterns: Trends, Costs, and Destinations",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(ABOUT),
            Line::from(""),
            Line::from(Span::styled(
                "Pages: Trends (monthly volume, transport usage) | Where to Visit (affordable \
                 destinations, cost vs duration) | What to Avoid (least popular destinations, \
                 costly transport).",
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(text))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Overview").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "1-4/Tab page  ↑/↓ select  ←/→ adjust  space toggle  a reset  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_panel(frame: &mut ratatui::Frame<'_>, area: Rect, panel: &Panel) {
    let block = Block::default().title(panel.title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    if panel.data.is_empty() {
        let msg = Paragraph::new(no_data_message(panel.title))
            .style(Style::default().fg(Color::Yellow))
            .wrap(Wrap { trim: true });
        frame.render_widget(msg, inner);
        return;
    }

    match &panel.data {
        PanelData::Categories(table) => {
            let bars = category_bars(table.rows.iter().map(|(k, v)| (k.as_str(), *v)), |v| format!("${v:.0}"));
            draw_bars(frame, inner, bars);
        }
        PanelData::Counts(table) => {
            let bars = category_bars(table.rows.iter().map(|(k, v)| (k.as_str(), *v as f64)), |v| {
                format!("{v:.0}")
            });
            draw_bars(frame, inner, bars);
        }
        PanelData::Monthly(table) => {
            let series: Vec<(f64, f64)> = table
                .values()
                .enumerate()
                .map(|(i, &n)| (i as f64, n as f64))
                .collect();
            let months: Vec<String> = table.keys().map(ToString::to_string).collect();
            let fmt_x = |v: f64| {
                let i = v.round();
                if i < 0.0 {
                    return String::new();
                }
                months.get(i as usize).cloned().unwrap_or_default()
            };
            let fmt_y = |v: f64| format!("{v:.0}");
            let (x_bounds, y_bounds) = TravelChart::bounds_for(&series);
            let chart = TravelChart {
                line: &series,
                points: &series,
                x_bounds,
                y_bounds,
                x_label: panel.labels.x,
                y_label: panel.labels.y,
                fmt_x: &fmt_x,
                fmt_y: &fmt_y,
            };
            frame.render_widget(chart, inner);
        }
        PanelData::Scatter(points) => {
            let series: Vec<(f64, f64)> = points
                .iter()
                .map(|p| (p.duration_days as f64, p.total_cost))
                .collect();
            let fmt_x = |v: f64| format!("{v:.0}");
            let fmt_y = |v: f64| format!("{v:.0}");
            let (x_bounds, y_bounds) = TravelChart::bounds_for(&series);
            let chart = TravelChart {
                line: &[],
                points: &series,
                x_bounds,
                y_bounds,
                x_label: panel.labels.x,
                y_label: panel.labels.y,
                fmt_x: &fmt_x,
                fmt_y: &fmt_y,
            };
            frame.render_widget(chart, inner);
        }
        PanelData::Label(_) | PanelData::Amount(_) => {}
    }
}

/// Horizontal bar entries: (label, bar length, value text).
fn category_bars<'a, F>(rows: impl Iterator<Item = (&'a str, f64)>, fmt_value: F) -> Vec<(String, u64, String)>
where
    F: Fn(f64) -> String,
{
    rows.map(|(k, v)| (truncate(k, 20), v.max(0.0).round() as u64, fmt_value(v)))
        .collect()
}

fn draw_bars(frame: &mut ratatui::Frame<'_>, area: Rect, bars: Vec<(String, u64, String)>) {
    let bars: Vec<Bar> = bars
        .into_iter()
        .map(|(label, value, text)| {
            Bar::default()
                .label(Line::from(label))
                .value(value)
                .text_value(text)
        })
        .collect();

    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}
