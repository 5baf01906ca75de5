use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::models::ArtistEntry;
use crate::ui::styles;
use crate::utils::truncate;

/// Render the roster tab - artist table with a detail panel
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    render_artist_table(frame, app, chunks[0]);
    render_artist_panel(frame, app, chunks[1]);
}

fn render_artist_table(frame: &mut Frame, app: &App, area: Rect) {
    let (artists, more_hidden) = app.visible_artists();
    let total = app.filtered_sorted().len();

    let title = format!(" Artists ({}/{}) ", artists.len(), total);
    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.viewing_artist.is_none()));

    if artists.is_empty() {
        let message = if app.roster.is_empty() {
            "No artists loaded"
        } else {
            "No artists match the search"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style())))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Listeners"),
        Cell::from("Updated"),
        Cell::from("St"),
    ])
    .style(styles::title_style())
    .height(1);

    let mut rows: Vec<Row> = artists
        .iter()
        .enumerate()
        .map(|(i, artist)| {
            let style = if i == app.roster_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let (status, status_style) = status_cell(artist);

            Row::new(vec![
                Cell::from(truncate(&artist.name, 40)),
                Cell::from(format!("{:>12}", artist.listeners.to_string())),
                Cell::from(artist.last_update_display.clone()),
                Cell::from(Span::styled(status, status_style)),
            ])
            .style(style)
        })
        .collect();

    if more_hidden {
        let hidden = total - artists.len();
        rows.push(
            Row::new(vec![Cell::from(Span::styled(
                format!("[m] show {} more...", hidden),
                styles::highlight_style(),
            ))])
            .height(1),
        );
    }

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(3),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.roster_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Status glyph: up to date today, needs an update, or still loading.
fn status_cell(artist: &ArtistEntry) -> (&'static str, ratatui::style::Style) {
    if artist.listeners.is_loading() {
        ("·", styles::muted_style())
    } else if artist.is_current {
        ("✓", styles::success_style())
    } else {
        ("!", styles::highlight_style())
    }
}

fn render_artist_panel(frame: &mut Frame, app: &App, area: Rect) {
    let (artists, _) = app.visible_artists();
    let selected = artists.get(app.roster_selection);
    let placeholder = "-";

    let content = match selected {
        Some(artist) => {
            let mut lines = vec![];

            lines.push(Line::from(Span::styled(
                artist.name.clone(),
                styles::title_style(),
            )));
            lines.push(Line::from(""));

            lines.push(Line::from(vec![
                Span::styled("Listeners:   ", styles::muted_style()),
                Span::raw(artist.listeners.to_string()),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Last update: ", styles::muted_style()),
                Span::raw(artist.last_update_display.clone()),
            ]));

            let (status_text, status_style) = if artist.listeners.is_loading() {
                ("loading...", styles::muted_style())
            } else if artist.is_current {
                ("up to date", styles::success_style())
            } else {
                ("needs update", styles::highlight_style())
            };
            lines.push(Line::from(vec![
                Span::styled("Status:      ", styles::muted_style()),
                Span::styled(status_text, status_style),
            ]));

            lines.push(Line::from(""));

            let url = if artist.source_url.is_empty() {
                placeholder.to_string()
            } else {
                truncate(&artist.source_url, 36)
            };
            lines.push(Line::from(vec![
                Span::styled("Source:      ", styles::muted_style()),
                Span::raw(url),
            ]));

            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Press Enter to view listener history",
                styles::muted_style(),
            )));

            lines
        }
        None => vec![Line::from(Span::styled(
            "No artist selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}
