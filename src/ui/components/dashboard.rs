use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::feedback::narrative::SectionKind;
use crate::feedback::request::FeedbackState;
use crate::session::report::{EMPTY_REPORT_MESSAGE, SessionReport};
use crate::ui::components::narrative::NarrativePanel;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

/// End-of-run report: score summary plus the four coaching panels.
pub struct Dashboard<'a> {
    pub report: Option<&'a SessionReport>,
    pub feedback: &'a FeedbackState,
    pub notice: Option<&'a str>,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        report: Option<&'a SessionReport>,
        feedback: &'a FeedbackState,
        notice: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            report,
            feedback,
            notice,
            theme,
        }
    }

    fn accuracy_color(&self, accuracy: u32) -> Color {
        let colors = &self.theme.colors;
        if accuracy >= 80 {
            colors.success()
        } else if accuracy >= 60 {
            colors.warning()
        } else {
            colors.error()
        }
    }

    fn render_empty(&self, inner: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                EMPTY_REPORT_MESSAGE,
                Style::default().fg(colors.text_dim()),
            )),
        ];
        if let Some(notice) = self.notice {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                notice,
                Style::default().fg(colors.warning()),
            )));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }

    fn render_metrics(&self, report: &SessionReport, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let cards = [
            ("Attempted", report.total.to_string(), colors.fg()),
            ("Correct", report.correct.to_string(), colors.success()),
            (
                "Accuracy",
                format!("{}%", report.accuracy),
                self.accuracy_color(report.accuracy),
            ),
            ("Avg Time", report.avg_time_label(), colors.fg()),
        ];
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        for ((label, value, color), col) in cards.into_iter().zip(columns.iter()) {
            let block = Block::bordered()
                .title(format!(" {label} "))
                .border_style(Style::default().fg(colors.border()));
            Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(block)
            .render(*col, buf);
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Aptitude Practice Summary ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(report) = self.report else {
            self.render_empty(inner, buf);
            return;
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(6),
            ])
            .split(inner);

        let mut header = vec![
            Line::from(Span::styled(
                report.headline(),
                Style::default()
                    .fg(self.accuracy_color(report.accuracy))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Topic: ", Style::default().fg(colors.text_dim())),
                Span::styled(report.topic.clone(), Style::default().fg(colors.fg())),
                Span::styled("   Questions: ", Style::default().fg(colors.text_dim())),
                Span::styled(report.total.to_string(), Style::default().fg(colors.fg())),
                Span::styled(
                    format!("   {}", report.finished_at.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(colors.text_dim()),
                ),
            ]),
        ];
        if let Some(notice) = self.notice {
            header.push(Line::from(Span::styled(
                notice,
                Style::default().fg(colors.warning()),
            )));
        }
        Paragraph::new(header)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        self.render_metrics(report, layout[1], buf);

        ProgressBar::new("Accuracy", report.accuracy_ratio(), self.theme)
            .fill(self.accuracy_color(report.accuracy))
            .render(layout[2], buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(layout[3]);
        let mut panels = Vec::with_capacity(4);
        for row in rows.iter() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row);
            panels.extend(cols.iter().copied());
        }
        for (kind, panel_area) in SectionKind::ALL.into_iter().zip(panels) {
            NarrativePanel::new(kind, self.feedback.section(kind), self.theme)
                .render(panel_area, buf);
        }
    }
}
