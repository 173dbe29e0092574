use engine::MoneyCents;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{StatCard, panel},
            money::{styled_amount, styled_amount_bold},
        },
        theme::Theme,
    },
};

/// Summary cards over the visible rows. They follow the filters.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let stats = &state.stats;
    let currency = state.currency;

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 6),
            Constraint::Ratio(1, 6),
            Constraint::Ratio(1, 6),
            Constraint::Ratio(1, 6),
            Constraint::Ratio(2, 6),
        ])
        .split(area);

    let entries_subtitle = if stats.skipped > 0 {
        format!("{} unreadable", stats.skipped)
    } else {
        format!("of {}", state.view.source_len())
    };
    StatCard::new("Entries", stats.count.to_string(), theme)
        .subtitle(entries_subtitle)
        .render(frame, layout[0]);

    StatCard::new("Income", styled_amount(stats.income, currency, theme), theme)
        .render(frame, layout[1]);

    StatCard::new(
        "Expenses",
        Span::styled(
            stats.expenses.format(currency),
            Style::default().fg(theme.negative),
        ),
        theme,
    )
    .subtitle(format!("fixed {}", stats.fixed_total.format(currency)))
    .render(frame, layout[2]);

    StatCard::new(
        "Balance",
        styled_amount_bold(stats.balance, currency, theme),
        theme,
    )
    .subtitle(format!("total {}", stats.total.format(currency)))
    .render(frame, layout[3]);

    let block = panel("Top categories", false, theme);
    let inner = block.inner(layout[4]);
    frame.render_widget(block, layout[4]);

    let lines: Vec<Line<'_>> = if stats.by_category.is_empty() {
        vec![Line::from(Span::styled(
            "No expenses",
            Style::default().fg(theme.dim),
        ))]
    } else {
        stats
            .by_category
            .chunks(2)
            .take(inner.height as usize)
            .map(|pair| category_line(pair, state, theme))
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

fn category_line(
    pair: &[(engine::Category, MoneyCents)],
    state: &AppState,
    theme: &Theme,
) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (category, amount)) in pair.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            category.as_str(),
            Style::default().fg(theme.text),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            amount.format(state.currency),
            Style::default().fg(theme.dim),
        ));
    }
    Line::from(spans)
}
