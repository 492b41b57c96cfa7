use ratatui::layout::{Constraint, Flex, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let [header, main, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .areas(area);
        Self {
            header,
            main,
            footer,
        }
    }
}

pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    text.split('\n')
        .map(|line| line.chars().count().max(1).div_ceil(width))
        .sum()
}

/// Joins key hints into a single footer line, dropping trailing hints that
/// would not fit.
pub fn fit_hints(hints: &[&str], width: usize) -> String {
    let mut line = String::new();
    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let sep = if line.is_empty() { " " } else { "  " };
        if line.chars().count() + sep.len() + hint.chars().count() > width {
            break;
        }
        line.push_str(sep);
        line.push_str(hint);
    }
    line
}

/// Centers a popup taking the given share of `area`, but no smaller than
/// 60x16 unless the area itself is smaller.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (area.width as u32 * percent_x.min(100) as u32 / 100) as u16;
    let height = (area.height as u32 * percent_y.min(100) as u32 / 100) as u16;
    let width = width.max(60).min(area.width);
    let height = height.max(16).min(area.height);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_lines_count_each_source_line() {
        assert_eq!(wrapped_line_count("abcdef", 3), 2);
        assert_eq!(wrapped_line_count("ab\n\nabcd", 3), 4);
        assert_eq!(wrapped_line_count("x", 0), 0);
    }

    #[test]
    fn hints_stop_at_width() {
        let hints = ["[Enter] Submit", "[s] Solution", "[e] End"];
        assert_eq!(fit_hints(&hints, 80), " [Enter] Submit  [s] Solution  [e] End");
        assert_eq!(fit_hints(&hints, 30), " [Enter] Submit  [s] Solution");
        assert_eq!(fit_hints(&hints, 5), "");
    }

    #[test]
    fn centered_rect_never_exceeds_area() {
        let area = Rect::new(0, 0, 40, 10);
        let r = centered_rect(50, 50, area);
        assert_eq!(r, area);
        let big = Rect::new(0, 0, 200, 60);
        let r = centered_rect(50, 50, big);
        assert_eq!((r.width, r.height), (100, 30));
        assert_eq!((r.x, r.y), (50, 15));
    }
}
