use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    widgets::{Block, Clear, Widget},
};

/// Blank out a `width` by `height` box centered in `area`, fill it with
/// `style`, and return it.  The box is shrunk to fit `area` if necessary.
pub(crate) fn open_popup(
    area: Rect,
    width: u16,
    height: u16,
    style: Style,
    buf: &mut Buffer,
) -> Rect {
    let [popup] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
    let [popup] = Layout::vertical([height]).flex(Flex::Center).areas(popup);
    Clear.render(popup, buf);
    Block::new().style(style).render(popup, buf);
    popup
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{buffer::Cell, style::Color};

    #[test]
    fn test_centered_and_cleared() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buffer = Buffer::filled(area, Cell::new("x"));
        let style = Style::new().bg(Color::Blue);
        let popup = open_popup(area, 6, 4, style, &mut buffer);
        assert_eq!(popup, Rect::new(7, 3, 6, 4));
        assert_eq!(buffer[(7, 3)].symbol(), " ");
        assert_eq!(buffer[(7, 3)].bg, Color::Blue);
        assert_eq!(buffer[(6, 3)].symbol(), "x");
        assert_eq!(buffer[(12, 6)].symbol(), " ");
        assert_eq!(buffer[(13, 6)].symbol(), "x");
    }

    #[test]
    fn test_shrunk_to_area() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        let popup = open_popup(area, 50, 12, Style::new(), &mut buffer);
        assert_eq!(popup, area);
    }
}
