use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::HistoryPoint;
use crate::ui::styles;
use crate::utils::group_thousands;

/// Render the artist detail view - listener history chart
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let name = match app.viewing_artist.as_deref() {
        Some(name) => name,
        None => return,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(8)])
        .split(area);

    render_header(frame, app, name, chunks[0]);
    render_chart(frame, app, name, chunks[1]);
}

fn render_header(frame: &mut Frame, app: &App, name: &str, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(name.to_string(), styles::title_style()))];

    if let Some(last) = app.artist_history.last() {
        lines.push(Line::from(vec![
            Span::styled("Last update: ", styles::muted_style()),
            Span::raw(last.date.format("%d/%m/%Y").to_string()),
            Span::styled("   Listeners: ", styles::muted_style()),
            Span::raw(group_thousands(last.listeners)),
        ]));
    } else if let Some(entry) = app.viewed_entry() {
        lines.push(Line::from(vec![
            Span::styled("Last update: ", styles::muted_style()),
            Span::raw(entry.last_update_display.clone()),
        ]));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_chart(frame: &mut Frame, app: &App, name: &str, area: Rect) {
    let block = Block::default()
        .title(" Monthly listeners ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if !app.history_loaded {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "Loading history...",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    if app.artist_history.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!("No historical data found for {}", name),
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let points: Vec<(f64, f64)> = app
        .artist_history
        .iter()
        .map(|p| (p.date.num_days_from_ce() as f64, p.listeners as f64))
        .collect();

    let (x_bounds, x_labels) = x_axis(&app.artist_history);
    let (y_bounds, y_labels) = y_axis(&points);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(styles::chart_style())
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(styles::muted_style())
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(styles::muted_style())
                .bounds(y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn x_axis(history: &[HistoryPoint]) -> ([f64; 2], Vec<String>) {
    let (first, last) = match (history.first(), history.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return ([0.0, 1.0], Vec::new()),
    };

    let mut lo = first.date.num_days_from_ce() as f64;
    let mut hi = last.date.num_days_from_ce() as f64;
    if lo == hi {
        // A single observation still needs a non-degenerate axis.
        lo -= 1.0;
        hi += 1.0;
    }

    let labels = vec![
        first.date.format("%d/%m/%y").to_string(),
        last.date.format("%d/%m/%y").to_string(),
    ];
    ([lo, hi], labels)
}

fn y_axis(points: &[(f64, f64)]) -> ([f64; 2], Vec<String>) {
    let mut lo = f64::MAX;
    let mut hi = f64::MIN;
    for &(_, y) in points {
        lo = lo.min(y);
        hi = hi.max(y);
    }
    if lo == hi {
        lo = (lo - 1.0).max(0.0);
        hi += 1.0;
    }

    let mid = (lo + hi) / 2.0;
    let labels = vec![
        group_thousands(lo as u64),
        group_thousands(mid as u64),
        group_thousands(hi as u64),
    ];
    ([lo, hi], labels)
}
