use engine::{Currency, DESCRIPTION_MAX_CHARS, DraftField, EntryDraft};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::{
    app::FormState,
    ui::{
        components::{card::panel, centered_rect},
        theme::Theme,
    },
};

pub fn render(
    frame: &mut Frame<'_>,
    area: Rect,
    form: &FormState,
    currency: Currency,
    theme: &Theme,
) {
    let popup = centered_rect(60, 80, area);
    let block = panel("New entry", true, theme);
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let mut lines = Vec::new();
    for field in DraftField::ALL {
        let focused = form.focus == field;
        let marker = if focused { "› " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(format!("{:<16}", field.label()), label_style),
            Span::styled(
                field_value(&form.draft, field, currency, focused),
                Style::default().fg(theme.text),
            ),
        ]));

        if let Some(message) = form.errors.get(field) {
            lines.push(Line::from(Span::styled(
                format!("{:18}{message}", ""),
                Style::default().fg(theme.error),
            )));
        }
    }

    lines.push(Line::default());
    if form.submitting {
        lines.push(Line::from(Span::styled(
            "Saving...",
            Style::default().fg(theme.warning),
        )));
    } else if let Some(message) = &form.message {
        lines.push(Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(theme.error),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn field_value(draft: &EntryDraft, field: DraftField, currency: Currency, focused: bool) -> String {
    let cursor = if focused { "_" } else { "" };
    match field {
        DraftField::EntryType => format!("‹ {} ›", draft.entry_type),
        DraftField::Amount => format!("{} {}{cursor}", currency.symbol(), draft.amount),
        DraftField::Installments => format!("{}{cursor}", draft.installments),
        DraftField::CreatedAt => format!("{}{cursor}", draft.created_at),
        DraftField::Category => select(draft.category.map(|c| c.as_str())),
        DraftField::Source => select(draft.source.map(|s| s.as_str())),
        DraftField::PaymentMethod => select(draft.payment_method.map(|p| p.as_str())),
        DraftField::Description => format!(
            "{}{cursor}  ({}/{DESCRIPTION_MAX_CHARS})",
            draft.description,
            draft.description.chars().count()
        ),
        DraftField::Fixed => if draft.fixed { "[x]" } else { "[ ]" }.to_string(),
    }
}

fn select(value: Option<&'static str>) -> String {
    format!("‹ {} ›", value.unwrap_or("Select..."))
}
