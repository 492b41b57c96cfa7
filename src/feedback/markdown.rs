/// Inline span inside a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
    Code(String),
}

/// One source line of coaching text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// `### title`
    Heading(Vec<Inline>),
    /// `- item`
    Bullet(Vec<Inline>),
    Line(Vec<Inline>),
    Blank,
}

pub type Document = Vec<Block>;

/// Parses the small markdown subset the feedback service emits: level-3
/// headings, dash bullets, `**bold**`, `` `code` `` and line breaks.
/// Anything else is kept as plain text.
pub fn parse(text: &str) -> Document {
    text.split('\n')
        .map(|line| parse_line(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

fn parse_line(line: &str) -> Block {
    if let Some(rest) = line.strip_prefix("### ") {
        Block::Heading(parse_inline(rest))
    } else if let Some(rest) = line.strip_prefix("- ") {
        Block::Bullet(parse_inline(rest))
    } else if line.trim().is_empty() {
        Block::Blank
    } else {
        Block::Line(parse_inline(line))
    }
}

pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                flush(&mut plain, &mut spans);
                if end > 0 {
                    spans.push(Inline::Bold(after[..end].to_string()));
                }
                rest = &after[end + 2..];
                continue;
            }
        } else if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`') {
                flush(&mut plain, &mut spans);
                if end > 0 {
                    spans.push(Inline::Code(after[..end].to_string()));
                }
                rest = &after[end + 1..];
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            plain.push(c);
        }
        rest = chars.as_str();
    }

    flush(&mut plain, &mut spans);
    spans
}

fn flush(plain: &mut String, spans: &mut Vec<Inline>) {
    if !plain.is_empty() {
        spans.push(Inline::Text(std::mem::take(plain)));
    }
}

/// Drops leading and trailing blank lines.
pub fn trim_blank(mut doc: Document) -> Document {
    while doc.last() == Some(&Block::Blank) {
        doc.pop();
    }
    let leading = doc.iter().take_while(|b| **b == Block::Blank).count();
    doc.drain(..leading);
    doc
}

pub fn plain_text(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|s| match s {
            Inline::Text(t) | Inline::Bold(t) | Inline::Code(t) => t.as_str(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn heading_bullet_and_bold_map_to_blocks() {
        let doc = parse("### Overall Summary\n- point one\n**bold**");
        assert_eq!(
            doc,
            vec![
                Block::Heading(vec![text("Overall Summary")]),
                Block::Bullet(vec![text("point one")]),
                Block::Line(vec![Inline::Bold("bold".into())]),
            ]
        );
    }

    #[test]
    fn mixed_inline_spans() {
        let spans = parse_inline("Use **ratio** method: `a/b` then **scale**.");
        assert_eq!(
            spans,
            vec![
                text("Use "),
                Inline::Bold("ratio".into()),
                text(" method: "),
                Inline::Code("a/b".into()),
                text(" then "),
                Inline::Bold("scale".into()),
                text("."),
            ]
        );
    }

    #[test]
    fn bold_is_non_greedy() {
        let spans = parse_inline("**a** and **b**");
        assert_eq!(
            spans,
            vec![Inline::Bold("a".into()), text(" and "), Inline::Bold("b".into())]
        );
    }

    #[test]
    fn unclosed_markers_stay_literal() {
        assert_eq!(parse_inline("2 ** 3 is `pow"), vec![text("2 ** 3 is `pow")]);
    }

    #[test]
    fn marker_needs_line_start_and_space() {
        let doc = parse("  - indented\n-no space\n####deep");
        assert!(matches!(doc[0], Block::Line(_)));
        assert!(matches!(doc[1], Block::Line(_)));
        assert!(matches!(doc[2], Block::Line(_)));
    }

    #[test]
    fn crlf_and_blank_lines() {
        let doc = parse("- one\r\n\r\n- two\r\n");
        assert_eq!(
            doc,
            vec![
                Block::Bullet(vec![text("one")]),
                Block::Blank,
                Block::Bullet(vec![text("two")]),
                Block::Blank,
            ]
        );
        assert_eq!(trim_blank(doc).len(), 3);
    }

    #[test]
    fn bold_inside_bullet() {
        let doc = parse("- **Percentages**: 2/3 correct");
        assert_eq!(
            doc,
            vec![Block::Bullet(vec![
                Inline::Bold("Percentages".into()),
                text(": 2/3 correct"),
            ])]
        );
        if let Block::Bullet(spans) = &doc[0] {
            assert_eq!(plain_text(spans), "Percentages: 2/3 correct");
        }
    }

    #[test]
    fn multibyte_text_survives() {
        assert_eq!(parse_inline("ratio → **½**"), vec![text("ratio → "), Inline::Bold("½".into())]);
    }
}
