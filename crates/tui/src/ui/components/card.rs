use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::ui::theme::Theme;

/// Rounded block shared by the stats strip and the popups. Focused panels
/// take the accent border.
pub fn panel(title: &str, focused: bool, theme: &Theme) -> Block<'static> {
    let border = if focused {
        theme.border_focused
    } else {
        theme.border
    };

    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(theme.accent),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.surface))
}

/// One figure in bold, optionally followed by a dimmed line.
pub struct StatCard<'a> {
    title: &'a str,
    value: Span<'static>,
    subtitle: Option<String>,
    theme: &'a Theme,
}

impl<'a> StatCard<'a> {
    pub fn new(title: &'a str, value: impl Into<Span<'static>>, theme: &'a Theme) -> Self {
        Self {
            title,
            value: value.into(),
            subtitle: None,
            theme,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn render(self, frame: &mut Frame<'_>, area: Rect) {
        let block = panel(self.title, false, self.theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![Line::from(
            self.value
                .patch_style(Style::default().add_modifier(Modifier::BOLD)),
        )];
        if let Some(sub) = self.subtitle {
            lines.push(Line::from(Span::styled(
                sub,
                Style::default().fg(self.theme.dim),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
