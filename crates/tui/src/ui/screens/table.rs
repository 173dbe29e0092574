use engine::{COLUMNS, Entry, Field};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{AppState, Mode},
    ui::{components::money::entry_amount, theme::Theme},
};

const COLUMN_SPACING: u16 = 1;

fn width(field: Field) -> Constraint {
    match field {
        Field::CreatedAt => Constraint::Length(12),
        Field::Amount => Constraint::Length(14),
        Field::PaymentMethod => Constraint::Length(16),
        Field::Category => Constraint::Length(18),
        Field::Source => Constraint::Length(12),
        Field::Description => Constraint::Fill(1),
        Field::Installments => Constraint::Length(14),
        Field::Fixed => Constraint::Length(7),
        Field::EntryType => Constraint::Length(9),
    }
}

/// Renders the entries table and returns the header cell of every column,
/// in `COLUMNS` order.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) -> Vec<Rect> {
    let block = Block::default()
        .title(Span::styled(" Entries ", Style::default().fg(theme.accent)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_row = Rect {
        height: inner.height.min(1),
        ..inner
    };
    let headers = Layout::horizontal(COLUMNS.map(width))
        .spacing(COLUMN_SPACING)
        .split(header_row)
        .to_vec();

    if let Some(error) = &state.dashboard.error {
        render_message(
            frame,
            inner,
            Line::from(vec![
                Span::styled(error.as_str(), Style::default().fg(theme.error)),
                Span::raw(" Press "),
                Span::styled("r", Style::default().fg(theme.accent)),
                Span::raw(" to retry."),
            ]),
        );
        return headers;
    }

    if state.dashboard.loading && state.view.source_len() == 0 {
        render_message(
            frame,
            inner,
            Line::from(Span::styled(
                "Loading entries...",
                Style::default().fg(theme.dim),
            )),
        );
        return headers;
    }

    let header = Row::new(COLUMNS.map(|field| header_cell(field, state, theme)))
        .style(Style::default().fg(theme.text));

    let rows = state.view.iter().map(|entry| {
        Row::new(COLUMNS.map(|field| body_cell(field, entry, state, theme)))
            .style(Style::default().fg(theme.text))
    });

    let table = Table::new(rows, COLUMNS.map(width))
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .row_highlight_style(
            Style::default()
                .bg(theme.surface)
                .add_modifier(Modifier::BOLD),
        );

    let mut table_state = TableState::default();
    if state.mode() != Mode::Form && !state.view.is_empty() {
        table_state.select(Some(state.table.selected));
    }
    frame.render_stateful_widget(table, inner, &mut table_state);

    if state.view.is_empty() {
        let text = if state.view.source_len() == 0 {
            "No entries yet. Press a to add one."
        } else {
            "No entries match the active filters."
        };
        let below_header = Rect {
            y: inner.y.saturating_add(1),
            height: inner.height.saturating_sub(1),
            ..inner
        };
        render_message(
            frame,
            below_header,
            Line::from(Span::styled(text, Style::default().fg(theme.dim))),
        );
    }

    headers
}

fn header_cell(field: Field, state: &AppState, theme: &Theme) -> Cell<'static> {
    let filtered = state.entries.filters().is_active(field);
    let focused = state.table.focused_field() == field;

    let mut style = Style::default().fg(if filtered { theme.warning } else { theme.dim });
    if focused {
        style = style
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }

    let label = if filtered {
        format!("{} *", field.label())
    } else {
        field.label().to_string()
    };
    Cell::from(Span::styled(label, style))
}

fn body_cell(field: Field, entry: &Entry, state: &AppState, theme: &Theme) -> Cell<'static> {
    match field {
        Field::Amount => Cell::from(entry_amount(
            &entry.amount,
            &entry.entry_type,
            state.currency,
            theme,
        )),
        Field::CreatedAt => match entry.created_at.date() {
            Some(date) => Cell::from(date.format("%Y-%m-%d").to_string()),
            None => Cell::from(Span::styled(
                entry.created_at.as_str().to_string(),
                Style::default().fg(theme.dim),
            )),
        },
        Field::Installments => Cell::from(entry.installments.to_string()),
        other => Cell::from(other.extract(entry).into_text()),
    }
}

fn render_message(frame: &mut Frame<'_>, area: Rect, line: Line<'_>) {
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
