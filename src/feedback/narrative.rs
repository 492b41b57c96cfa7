use crate::feedback::markdown::{self, Document};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    Strongest,
    Weakest,
    Takeaway,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Summary,
        SectionKind::Strongest,
        SectionKind::Weakest,
        SectionKind::Takeaway,
    ];

    /// Heading prefix that opens this section in the service's text.
    pub fn marker(self) -> &'static str {
        match self {
            SectionKind::Summary => "Overall Summary",
            SectionKind::Strongest => "Strongest",
            SectionKind::Weakest => "Weakest",
            SectionKind::Takeaway => "Key Takeaway",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Summary => "Overall Summary",
            SectionKind::Strongest => "Strongest Topic",
            SectionKind::Weakest => "Weakest Topic",
            SectionKind::Takeaway => "Key Takeaway",
        }
    }

    pub fn loading_text(self) -> &'static str {
        match self {
            SectionKind::Summary => "Generating summary...",
            SectionKind::Strongest => "Finding strongest topic...",
            SectionKind::Weakest => "Checking weak areas...",
            SectionKind::Takeaway => "Preparing takeaway...",
        }
    }

    pub fn missing_text(self) -> &'static str {
        match self {
            SectionKind::Summary => "No summary was returned.",
            SectionKind::Strongest => "No strongest topic was returned.",
            SectionKind::Weakest => "No weak areas were returned.",
            SectionKind::Takeaway => "No takeaway was returned.",
        }
    }

    pub fn unavailable_text(self) -> &'static str {
        match self {
            SectionKind::Summary => "Summary unavailable.",
            SectionKind::Strongest => "Strongest topic unavailable.",
            SectionKind::Weakest => "Weak areas unavailable.",
            SectionKind::Takeaway => "Takeaway unavailable.",
        }
    }

    fn from_heading(title: &str) -> Option<Self> {
        let title = title.trim_start();
        Self::ALL
            .into_iter()
            .find(|kind| strip_prefix_ignore_case(title, kind.marker()).is_some())
    }

    /// Whatever follows the section's title words on its heading line,
    /// without the `:` or `-` separating them.
    fn heading_tail(self, title: &str) -> &str {
        let title = title.trim_start();
        let rest = strip_prefix_ignore_case(title, self.title())
            .or_else(|| strip_prefix_ignore_case(title, self.marker()))
            .unwrap_or(title);
        rest.trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace())
            .trim_end()
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Coaching text split into its four fixed sections. A section the service
/// left out stays `None` so it can be shown as missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NarrativeSections {
    pub summary: Option<Document>,
    pub strongest: Option<Document>,
    pub weakest: Option<Document>,
    pub takeaway: Option<Document>,
}

impl NarrativeSections {
    /// Splits on `### <marker>` lines. Text after the title words on a marker
    /// line opens the section; text before the first marker is ignored. A
    /// repeated marker appends.
    pub fn parse(text: &str) -> Self {
        let mut sections = Self::default();
        let mut current: Option<SectionKind> = None;
        let mut buffer = String::new();

        for line in text.split('\n') {
            let heading = line.strip_prefix("### ");
            if let Some((kind, title)) =
                heading.and_then(|t| SectionKind::from_heading(t).map(|k| (k, t)))
            {
                if let Some(open) = current.take() {
                    sections.append(open, &buffer);
                }
                buffer.clear();
                let tail = kind.heading_tail(title);
                if !tail.is_empty() {
                    buffer.push_str(tail);
                    buffer.push('\n');
                }
                current = Some(kind);
                continue;
            }
            if current.is_some() {
                buffer.push_str(line);
                buffer.push('\n');
            }
        }
        if let Some(open) = current {
            sections.append(open, &buffer);
        }
        sections
    }

    fn append(&mut self, kind: SectionKind, body: &str) {
        let doc = markdown::trim_blank(markdown::parse(body));
        self.slot_mut(kind).get_or_insert_with(Vec::new).extend(doc);
    }

    fn slot_mut(&mut self, kind: SectionKind) -> &mut Option<Document> {
        match kind {
            SectionKind::Summary => &mut self.summary,
            SectionKind::Strongest => &mut self.strongest,
            SectionKind::Weakest => &mut self.weakest,
            SectionKind::Takeaway => &mut self.takeaway,
        }
    }

    pub fn get(&self, kind: SectionKind) -> Option<&Document> {
        match kind {
            SectionKind::Summary => self.summary.as_ref(),
            SectionKind::Strongest => self.strongest.as_ref(),
            SectionKind::Weakest => self.weakest.as_ref(),
            SectionKind::Takeaway => self.takeaway.as_ref(),
        }
    }

    pub fn missing(&self) -> Vec<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::markdown::{Block, Inline};

    const FULL: &str = "Here is your report.\n\
### Overall Summary\n\
You answered **2 of 3** correctly.\n\
\n\
### Strongest Topic\n\
- Percentages\n\
### Weakest Topic\n\
- Speed on `ratio` questions\n\
### Key Takeaway\n\
Practice daily.\n";

    #[test]
    fn splits_all_four_sections() {
        let s = NarrativeSections::parse(FULL);
        assert!(s.missing().is_empty());
        assert_eq!(
            s.summary.unwrap(),
            vec![Block::Line(vec![
                Inline::Text("You answered ".into()),
                Inline::Bold("2 of 3".into()),
                Inline::Text(" correctly.".into()),
            ])]
        );
        assert_eq!(
            s.strongest.unwrap(),
            vec![Block::Bullet(vec![Inline::Text("Percentages".into())])]
        );
        assert_eq!(
            s.weakest.unwrap(),
            vec![Block::Bullet(vec![
                Inline::Text("Speed on ".into()),
                Inline::Code("ratio".into()),
                Inline::Text(" questions".into()),
            ])]
        );
        assert_eq!(
            s.takeaway.unwrap(),
            vec![Block::Line(vec![Inline::Text("Practice daily.".into())])]
        );
    }

    #[test]
    fn missing_marker_is_reported_not_swallowed() {
        let text = "### Overall Summary\nok\n### Weakest Topic\n- time\n### Key Takeaway\nrest";
        let s = NarrativeSections::parse(text);
        assert_eq!(s.missing(), vec![SectionKind::Strongest]);
        assert_eq!(s.weakest.as_ref().map(Vec::len), Some(1));
        assert_eq!(s.takeaway.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn sections_in_any_order() {
        let text = "### Key Takeaway\nlast\n### Overall Summary\nfirst";
        let s = NarrativeSections::parse(text);
        assert!(s.takeaway.is_some());
        assert!(s.summary.is_some());
        assert!(s.strongest.is_none());
    }

    #[test]
    fn other_headings_stay_inside_a_section() {
        let text = "### Overall Summary\n### Details\n- x";
        let s = NarrativeSections::parse(text);
        let summary = s.summary.unwrap();
        assert!(matches!(summary[0], Block::Heading(_)));
        assert!(matches!(summary[1], Block::Bullet(_)));
    }

    #[test]
    fn markers_match_case_insensitively() {
        let s = NarrativeSections::parse("### overall summary\nhi\n### STRONGEST AREA\nyo");
        assert!(s.summary.is_some());
        assert!(s.strongest.is_some());
    }

    #[test]
    fn marker_line_tail_opens_the_section() {
        let text = "### Overall Summary\nok\n\
### Strongest Topic: Percentages\n\
### Weakest Topic - Ages\n\
### Key Takeaway\nx";
        let s = NarrativeSections::parse(text);
        assert_eq!(
            s.strongest.unwrap(),
            vec![Block::Line(vec![Inline::Text("Percentages".into())])]
        );
        assert_eq!(
            s.weakest.unwrap(),
            vec![Block::Line(vec![Inline::Text("Ages".into())])]
        );
        assert_eq!(s.summary.unwrap().len(), 1);
    }

    #[test]
    fn tail_after_short_marker_is_kept() {
        let s = NarrativeSections::parse("### Strongest area is **Averages**\n- fast");
        assert_eq!(
            s.strongest.unwrap(),
            vec![
                Block::Line(vec![
                    Inline::Text("area is ".into()),
                    Inline::Bold("Averages".into()),
                ]),
                Block::Bullet(vec![Inline::Text("fast".into())]),
            ]
        );
    }

    #[test]
    fn empty_section_is_present_but_empty() {
        let s = NarrativeSections::parse("### Overall Summary\n\n### Key Takeaway\nx");
        assert_eq!(s.summary, Some(Vec::new()));
    }

    #[test]
    fn text_without_markers_yields_nothing() {
        let s = NarrativeSections::parse("just prose");
        assert_eq!(s.missing().len(), 4);
    }
}
