use engine::{Currency, EntryType, Lenient, MoneyCents};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Creates a styled span for a money amount with semantic coloring.
///
/// - Positive amounts: green
/// - Negative amounts: red
/// - Zero: neutral text color
#[must_use]
pub fn styled_amount(amount: MoneyCents, currency: Currency, theme: &Theme) -> Span<'static> {
    Span::styled(amount.format(currency), Style::default().fg(sign_color(amount, theme)))
}

/// Same as [`styled_amount`], bold. Used for totals.
#[must_use]
pub fn styled_amount_bold(amount: MoneyCents, currency: Currency, theme: &Theme) -> Span<'static> {
    Span::styled(
        amount.format(currency),
        Style::default()
            .fg(sign_color(amount, theme))
            .add_modifier(Modifier::BOLD),
    )
}

/// Amount cell of the entries table: income in green, expenses in the
/// normal color, unparseable amounts dimmed as they were received.
#[must_use]
pub fn entry_amount(
    amount: &Lenient<MoneyCents>,
    entry_type: &Lenient<EntryType>,
    currency: Currency,
    theme: &Theme,
) -> Span<'static> {
    match amount {
        Lenient::Valid(amount) => {
            let color = match entry_type {
                Lenient::Valid(EntryType::Income) => theme.positive,
                _ => theme.text,
            };
            Span::styled(amount.format(currency), Style::default().fg(color))
        }
        Lenient::Malformed(raw) => Span::styled(
            if raw.is_empty() { "?".to_string() } else { raw.clone() },
            Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC),
        ),
    }
}

fn sign_color(amount: MoneyCents, theme: &Theme) -> ratatui::style::Color {
    if amount.is_positive() {
        theme.positive
    } else if amount.is_zero() {
        theme.text
    } else {
        theme.negative
    }
}
