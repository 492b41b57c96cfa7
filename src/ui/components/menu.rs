use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Topic picker shown on the setup screen.
pub struct TopicMenu<'a> {
    pub items: Vec<String>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> TopicMenu<'a> {
    pub fn new(items: Vec<String>, theme: &'a Theme) -> Self {
        Self {
            items,
            selected: 0,
            theme,
        }
    }

    pub fn current(&self) -> &str {
        self.items
            .get(self.selected)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    /// First index of the visible window that keeps `selected` on screen.
    fn scroll_offset(&self, visible: usize) -> usize {
        if visible == 0 || self.selected < visible {
            0
        } else {
            self.selected + 1 - visible
        }
    }
}

impl Widget for &TopicMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "aptiq",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Aptitude Practice",
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                "Pick a topic to begin",
                Style::default().fg(colors.text_dim()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let visible = layout[1].height as usize;
        let offset = self.scroll_offset(visible);
        let lines: Vec<Line> = self
            .items
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, topic)| {
                let is_selected = i == self.selected;
                let indicator = if is_selected { ">" } else { " " };
                Line::from(Span::styled(
                    format!("  {indicator} {topic}"),
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                ))
            })
            .collect();
        Paragraph::new(lines).render(layout[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(theme: &Theme) -> TopicMenu<'_> {
        TopicMenu::new(vec!["Percentages".into(), "Averages".into(), "Ages".into()], theme)
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let theme = Theme::default();
        let mut m = menu(&theme);
        m.prev();
        assert_eq!(m.current(), "Ages");
        m.next();
        assert_eq!(m.current(), "Percentages");
    }

    #[test]
    fn scroll_keeps_selection_visible() {
        let theme = Theme::default();
        let mut m = menu(&theme);
        m.selected = 2;
        assert_eq!(m.scroll_offset(2), 1);
        assert_eq!(m.scroll_offset(5), 0);
    }

    #[test]
    fn renders_selected_topic() {
        let theme = Theme::default();
        let mut m = menu(&theme);
        m.next();
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        (&m).render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("> Averages"));
    }
}
