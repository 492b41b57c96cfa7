use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::state::{OptionMark, SessionState};
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

pub struct QuestionView<'a> {
    pub session: &'a SessionState,
    pub theme: &'a Theme,
}

impl<'a> QuestionView<'a> {
    pub fn new(session: &'a SessionState, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    fn option_line(&self, idx: usize, text: &str) -> Line<'static> {
        let colors = &self.theme.colors;
        let mark = self.session.option_mark(idx);
        let (symbol, style) = match mark {
            OptionMark::Idle => (" ", Style::default().fg(colors.fg())),
            OptionMark::Selected => (
                ">",
                Style::default()
                    .fg(colors.accent())
                    .bg(colors.option_selected_bg())
                    .add_modifier(Modifier::BOLD),
            ),
            OptionMark::Correct => (
                "\u{2713}",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ),
            OptionMark::Incorrect => (
                "\u{2717}",
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::CROSSED_OUT),
            ),
            OptionMark::Locked => (" ", Style::default().fg(colors.text_dim())),
        };
        Line::from(vec![
            Span::styled(format!(" {symbol} "), style),
            Span::styled(format!("[{}] ", idx + 1), Style::default().fg(colors.text_dim())),
            Span::styled(text.to_string(), style),
        ])
    }
}

impl Widget for QuestionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(question) = self.session.current() else {
            return;
        };

        let block = Block::bordered()
            .title(format!(" Question {} ", self.session.question_number()))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width.saturating_sub(2) as usize;
        let prompt_height = wrapped_line_count(&question.prompt, width.max(1)) as u16 + 1;
        let options_height = question.options.len() as u16 + 1;
        let show_solution = self.session.solution_visible();

        let mut constraints = vec![
            Constraint::Length(prompt_height),
            Constraint::Length(options_height),
        ];
        if show_solution {
            constraints.push(Constraint::Min(3));
        } else {
            constraints.push(Constraint::Min(0));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        Paragraph::new(question.prompt.as_str())
            .style(Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: false })
            .block(Block::default().padding(ratatui::widgets::Padding::horizontal(1)))
            .render(layout[0], buf);

        let lines: Vec<Line> = question
            .options
            .iter()
            .enumerate()
            .map(|(i, opt)| self.option_line(i, opt))
            .collect();
        Paragraph::new(lines).render(layout[1], buf);

        if show_solution {
            let solution = if question.solution.trim().is_empty() {
                "No explanation was provided."
            } else {
                question.solution.as_str()
            };
            Paragraph::new(solution)
                .style(Style::default().fg(colors.fg()))
                .wrap(Wrap { trim: false })
                .block(
                    Block::bordered()
                        .title(" Solution ")
                        .border_style(Style::default().fg(colors.accent())),
                )
                .render(layout[2], buf);
        }
    }
}
