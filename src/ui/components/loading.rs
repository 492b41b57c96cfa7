use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

const FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct LoadingIndicator<'a> {
    pub message: &'a str,
    pub frame: usize,
    pub theme: &'a Theme,
}

impl<'a> LoadingIndicator<'a> {
    pub fn new(message: &'a str, frame: usize, theme: &'a Theme) -> Self {
        Self {
            message,
            frame,
            theme,
        }
    }
}

impl Widget for LoadingIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let top_pad = inner.height.saturating_sub(1) / 2;
        let mut lines: Vec<Line> = (0..top_pad).map(|_| Line::from("")).collect();
        lines.push(Line::from(vec![
            Span::styled(
                FRAMES[self.frame % FRAMES.len()],
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", self.message), Style::default().fg(colors.fg())),
        ]));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
