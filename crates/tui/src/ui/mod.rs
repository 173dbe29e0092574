pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use engine::{Bounds, COLUMNS};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Mode};
use components::hints::{KeyHint, hint_separator, hints_to_spans};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

/// Draws one frame. Returns the area of the filter editor popup when one is
/// open, so pointer events can be tested against it.
pub fn render(frame: &mut Frame<'_>, state: &AppState) -> Option<Bounds> {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    // Info bar, stats strip, entries table, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    screens::stats::render(frame, layout[1], state, &theme);
    let headers = screens::table::render(frame, layout[2], state, &theme);
    render_bottom_bar(frame, layout[3], state, &theme);

    let bounds = state.editor.open_field().and_then(|field| {
        let column = COLUMNS.iter().position(|f| *f == field)?;
        let anchor = headers.get(column)?;
        screens::filter_editor::render(frame, *anchor, area, state, &theme)
    });

    if let Some(form) = &state.form {
        screens::entry_form::render(frame, area, form, state.currency, &theme);
    }
    components::toast::render(frame, area, state.toast.as_ref());

    bounds
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .dashboard
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let active = state.entries.filters().active().count();
    let (status, status_style) = if state.dashboard.loading {
        ("LOADING", Style::default().fg(theme.warning))
    } else if state.dashboard.error.is_some() {
        ("ERR", Style::default().fg(theme.error))
    } else {
        ("OK", Style::default().fg(theme.positive))
    };

    let line = Line::from(vec![
        Span::styled("Backend", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Rows", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}/{}  ", state.view.len(), state.view.source_len())),
        Span::styled("Filters", Style::default().fg(theme.dim)),
        Span::raw(format!(": {active}  ")),
        Span::styled("Refresh", Style::default().fg(theme.dim)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints = match state.mode() {
        Mode::Table => vec![
            KeyHint::new("←/→", "column"),
            KeyHint::new("↑/↓", "row"),
            KeyHint::new("f", "filter"),
            KeyHint::new("x", "clear column"),
            KeyHint::new("c", "clear all"),
            KeyHint::new("a", "add"),
            KeyHint::new("r", "reload"),
        ],
        Mode::Filter => vec![
            KeyHint::new("tab", "next control"),
            KeyHint::new("x", "clear"),
            KeyHint::new("esc", "close"),
        ],
        Mode::Form => vec![
            KeyHint::new("tab", "next field"),
            KeyHint::new("←/→", "change"),
            KeyHint::new("enter", "save"),
            KeyHint::new("esc", "cancel"),
        ],
    };

    let mut parts = hints_to_spans(&hints, theme);
    if state.mode() == Mode::Table {
        parts.push(hint_separator(theme));
        parts.extend(hints_to_spans(&[KeyHint::new("q", "quit")], theme));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

#[cfg(test)]
mod tests {
    use chrono_tz::Tz;
    use engine::{Category, Currency, Entry, Lenient};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::ui::keymap::AppAction;

    fn state() -> AppState {
        let mut state = AppState::new(Currency::Usd, Tz::UTC, "http://test".to_string());
        state.finish_load(Ok(vec![
            Entry::builder("1")
                .cents(1250)
                .category(Lenient::Valid(Category::Gas))
                .created_at("2024-01-01")
                .build(),
            Entry::builder("2")
                .amount(Lenient::Malformed("n/a".to_string()))
                .created_at("yesterday")
                .build(),
        ]));
        state
    }

    fn draw(state: &AppState) -> (String, Option<Bounds>) {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        let mut bounds = None;
        terminal.draw(|frame| bounds = render(frame, state)).unwrap();
        let buffer = terminal.backend().buffer();
        let text = buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        (text, bounds)
    }

    #[test]
    fn table_shows_rows_and_raw_values() {
        let (text, bounds) = draw(&state());
        assert!(bounds.is_none());
        assert!(text.contains("Payment Method"));
        assert!(text.contains("$12.50"));
        assert!(text.contains("n/a"));
        assert!(text.contains("yesterday"));
        assert!(text.contains("Rows: 2/2"));
    }

    #[test]
    fn open_editor_reports_its_bounds() {
        let mut state = state();
        state.handle(AppAction::Submit);
        let (text, bounds) = draw(&state);
        let bounds = bounds.unwrap();
        assert!(text.contains("Filter: Date"));
        assert!(bounds.width >= 30);
        assert!(bounds.y > 0);
    }

    #[test]
    fn error_replaces_table() {
        let mut state = state();
        state.finish_load(Err("Server unreachable".to_string()));
        let (text, _) = draw(&state);
        assert!(text.contains("Server unreachable"));
        assert!(text.contains("to retry"));
    }
}
