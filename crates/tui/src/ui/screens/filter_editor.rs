use engine::{Bounds, ChecklistOption, EditorControls, parse_bound};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    app::{AppState, EditorFocus, EditorUi},
    ui::{
        components::{card::panel, fit_within},
        theme::Theme,
    },
};

const MIN_WIDTH: u16 = 30;
const MAX_OPTIONS: usize = 10;

/// Renders the popup of the open column below its header cell and returns
/// the area it covers. `None` when no editor is open.
pub fn render(
    frame: &mut Frame<'_>,
    anchor: Rect,
    area: Rect,
    state: &AppState,
    theme: &Theme,
) -> Option<Bounds> {
    let (field, controls) = state.open_controls()?;

    let (mut lines, hint) = match &controls {
        EditorControls::Checklist { options } => (
            checklist_lines(options, &state.editor_ui, theme),
            "space toggle  x clear  esc close",
        ),
        EditorControls::Comparison { op, .. } => (
            vec![
                control_line(
                    "Operator",
                    format!("‹ {} ›", op.label()),
                    state.editor_ui.focus == EditorFocus::Operator,
                    theme,
                ),
                control_line(
                    "Value",
                    format!("{}_", state.editor_ui.threshold),
                    state.editor_ui.focus == EditorFocus::Threshold,
                    theme,
                ),
            ],
            "tab switch  ←/→ operator  enter done",
        ),
        EditorControls::DateRange { .. } => (
            vec![
                date_line(
                    "From",
                    &state.editor_ui.start,
                    state.editor_ui.focus == EditorFocus::Start,
                    theme,
                ),
                date_line(
                    "To",
                    &state.editor_ui.end,
                    state.editor_ui.focus == EditorFocus::End,
                    theme,
                ),
            ],
            "yyyy-mm-dd  tab switch  enter done",
        ),
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(theme.dim))));

    let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let popup = fit_within(
        Rect {
            x: anchor.x,
            y: anchor.y.saturating_add(1),
            width: content_width.saturating_add(2).max(MIN_WIDTH),
            height: lines.len() as u16 + 2,
        },
        area,
    );

    let block = panel(&format!("Filter: {}", field.label()), true, theme);
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    frame.render_widget(Paragraph::new(lines), inner);

    Some(Bounds {
        x: popup.x,
        y: popup.y,
        width: popup.width,
        height: popup.height,
    })
}

fn checklist_lines(
    options: &[ChecklistOption],
    ui: &EditorUi,
    theme: &Theme,
) -> Vec<Line<'static>> {
    if options.is_empty() {
        return vec![Line::from(Span::styled(
            "No values",
            Style::default().fg(theme.dim),
        ))];
    }

    let offset = (ui.cursor + 1).saturating_sub(MAX_OPTIONS);
    options
        .iter()
        .enumerate()
        .skip(offset)
        .take(MAX_OPTIONS)
        .map(|(i, option)| {
            let mark = if option.checked { "[x]" } else { "[ ]" };
            let label = if option.value.is_empty() {
                "(blank)"
            } else {
                option.value.as_str()
            };
            let mut style = Style::default().fg(if option.checked {
                theme.text
            } else {
                theme.dim
            });
            if i == ui.cursor {
                style = style.fg(theme.accent).add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(format!("{mark} {label}"), style))
        })
        .collect()
}

fn control_line(label: &str, value: String, focused: bool, theme: &Theme) -> Line<'static> {
    let value_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(format!("{label:<9}"), Style::default().fg(theme.dim)),
        Span::styled(value, value_style),
    ])
}

fn date_line(label: &str, buffer: &str, focused: bool, theme: &Theme) -> Line<'static> {
    let mut line = control_line(label, format!("{buffer}_"), focused, theme);
    if !buffer.is_empty() && parse_bound(buffer).is_none() {
        line.push_span(Span::styled(" (open)", Style::default().fg(theme.warning)));
    }
    line
}
