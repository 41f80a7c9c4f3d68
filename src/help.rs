use crate::popup::open_popup;
use crate::theme::Palette;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Widget},
};

/// Key bindings and what they do
static BINDINGS: &[(&str, &str)] = &[
    ("h/l, LEFT/RIGHT", "Select previous/next day"),
    ("k/j, UP/DOWN", "Select same day last/next week"),
    ("p/n, PAGE UP/DOWN", "Show previous/next month"),
    ("0, HOME", "Go to today"),
    ("TAB", "Switch between calendar and tasks"),
    ("a", "Add a task to the selected day"),
    ("SPACE, ENTER", "Toggle task completed/pending"),
    ("e", "Expand/collapse task description"),
    ("d, DELETE", "Delete task"),
    ("T", "Toggle light/dark theme"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

static DISMISS: &str = "Press the Any Key to dismiss.";

/// Width of the key column
const KEY_WIDTH: usize = 20;

/// Overlay listing the key bindings
#[derive(Clone, Copy, Debug)]
pub(crate) struct Help<'a> {
    palette: &'a Palette,
}

impl<'a> Help<'a> {
    pub(crate) fn new(palette: &'a Palette) -> Self {
        Help { palette }
    }

    fn text(&self) -> Text<'static> {
        let mut lines = BINDINGS
            .iter()
            .map(|&(keys, action)| {
                Line::from(vec![
                    Span::styled(format!("{keys:<KEY_WIDTH$}"), self.palette.heading),
                    Span::styled(action, self.palette.base),
                ])
            })
            .collect::<Vec<_>>();
        lines.push(Line::default());
        lines.push(Line::styled(DISMISS, self.palette.muted));
        Text::from(lines)
    }
}

impl Widget for Help<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        // Text plus border, plus a blank column on either side
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(4);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let popup = open_popup(area, width, height, self.palette.base, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.palette.base)
            .render(popup.inner(Margin::new(1, 0)), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::buffer_lines;
    use crate::theme::LIGHT;

    #[test]
    fn test_render() {
        let area = Rect::new(0, 0, 70, 20);
        let mut buffer = Buffer::empty(area);
        Help::new(&LIGHT).render(area, &mut buffer);
        let lines = buffer_lines(&buffer);
        assert!(lines.iter().any(|ln| ln.contains("─ Commands ─")));
        assert!(lines
            .iter()
            .any(|ln| ln.contains("│a                   Add a task to the selected day")));
        assert!(lines
            .iter()
            .any(|ln| ln.contains("│e                   Expand/collapse task description")));
        assert!(lines
            .iter()
            .any(|ln| ln.contains("│Press the Any Key to dismiss.")));
    }

    #[test]
    fn test_keys_highlighted() {
        let area = Rect::new(0, 0, 70, 20);
        let mut buffer = Buffer::empty(area);
        Help::new(&LIGHT).render(area, &mut buffer);
        let lines = buffer_lines(&buffer);
        let (y, row) = lines
            .iter()
            .enumerate()
            .find(|(_, ln)| ln.contains("│TAB"))
            .unwrap();
        let x = row.chars().position(|c| c == '│').unwrap() + 1;
        let (x, y) = (u16::try_from(x).unwrap(), u16::try_from(y).unwrap());
        assert_eq!(Some(buffer[(x, y)].fg), LIGHT.heading.fg);
    }
}
