use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::feedback::markdown::{Block as MdBlock, Inline};
use crate::feedback::narrative::SectionKind;
use crate::feedback::request::SectionView;
use crate::ui::theme::{Theme, ThemeColors};

pub const BULLET: &str = "\u{2022} ";

fn inline_spans(spans: &[Inline], base: Style, colors: &ThemeColors) -> Vec<Span<'static>> {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(t) => Span::styled(t.clone(), base),
            Inline::Bold(t) => Span::styled(t.clone(), base.add_modifier(Modifier::BOLD)),
            Inline::Code(t) => Span::styled(t.clone(), base.fg(colors.code_fg())),
        })
        .collect()
}

/// Converts parsed coaching text into display lines, one per source line.
pub fn document_lines(doc: &[MdBlock], colors: &ThemeColors) -> Vec<Line<'static>> {
    let base = Style::default().fg(colors.fg());
    doc.iter()
        .map(|block| match block {
            MdBlock::Heading(spans) => {
                let style = base.fg(colors.accent()).add_modifier(Modifier::BOLD);
                Line::from(inline_spans(spans, style, colors))
            }
            MdBlock::Bullet(spans) => {
                let mut out = vec![Span::styled(BULLET, base.fg(colors.accent()))];
                out.extend(inline_spans(spans, base, colors));
                Line::from(out)
            }
            MdBlock::Line(spans) => Line::from(inline_spans(spans, base, colors)),
            MdBlock::Blank => Line::from(""),
        })
        .collect()
}

pub fn section_lines(view: &SectionView<'_>, colors: &ThemeColors) -> Vec<Line<'static>> {
    match view {
        SectionView::Loading(text) => vec![Line::from(Span::styled(
            format!("{BULLET}{text}"),
            Style::default().fg(colors.text_dim()),
        ))],
        SectionView::Content(doc) if doc.is_empty() => vec![Line::from(Span::styled(
            "(empty)",
            Style::default().fg(colors.text_dim()),
        ))],
        SectionView::Content(doc) => document_lines(doc, colors),
        SectionView::Notice(text) => vec![Line::from(Span::styled(
            format!("{BULLET}{text}"),
            Style::default().fg(colors.warning()),
        ))],
    }
}

/// One titled coaching panel on the report screen.
pub struct NarrativePanel<'a> {
    pub kind: SectionKind,
    pub view: SectionView<'a>,
    pub theme: &'a Theme,
}

impl<'a> NarrativePanel<'a> {
    pub fn new(kind: SectionKind, view: SectionView<'a>, theme: &'a Theme) -> Self {
        Self { kind, view, theme }
    }
}

impl Widget for NarrativePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.kind.title()))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(section_lines(&self.view, colors))
            .wrap(Wrap { trim: false })
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::markdown::parse;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn maps_each_block_to_one_line() {
        let colors = ThemeColors::default();
        let lines = document_lines(&parse("### Overall Summary\n- point one\n**bold**"), &colors);
        assert_eq!(lines.len(), 3);

        assert_eq!(line_text(&lines[0]), "Overall Summary");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));

        assert_eq!(lines[1].spans[0].content, BULLET);
        assert_eq!(line_text(&lines[1]), "\u{2022} point one");

        assert_eq!(lines[2].spans.len(), 1);
        assert_eq!(lines[2].spans[0].content, "bold");
        assert!(lines[2].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn code_spans_get_code_color() {
        let colors = ThemeColors::default();
        let lines = document_lines(&parse("use `x/y`"), &colors);
        assert_eq!(lines[0].spans[1].style.fg, Some(colors.code_fg()));
    }

    #[test]
    fn placeholders_render_as_bullets() {
        let colors = ThemeColors::default();
        let lines = section_lines(&SectionView::Loading("Generating summary..."), &colors);
        assert_eq!(line_text(&lines[0]), "\u{2022} Generating summary...");
    }
}
