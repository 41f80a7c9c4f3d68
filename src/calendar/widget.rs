use super::grid::{DayCell, GridCell, MonthGrid, DAYS_IN_WEEK};
use crate::theme::Palette;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget},
};

static WEEKDAYS: [&str; DAYS_IN_WEEK] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Number of columns per day of week
const DAY_WIDTH: u16 = 6;

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

/// Number of lines taken up by the month title, the weekday header, and its
/// rule
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week of the calendar
const WEEK_LINES: u16 = 2;

const ACS_HLINE: char = '─';

const TASK_DOT: &str = "•";

/// Draws one month as a grid of days.  Today is bracketed, the selected day
/// is highlighted, and days with tasks get a dot.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Calendar<'a> {
    grid: &'a MonthGrid,
    palette: &'a Palette,
}

impl<'a> Calendar<'a> {
    pub(crate) fn new(grid: &'a MonthGrid, palette: &'a Palette) -> Self {
        Calendar { grid, palette }
    }

    fn day_spans(&self, day: &DayCell) -> Line<'static> {
        let mut style = self.palette.base;
        if day.is_today {
            style = style.patch(self.palette.today);
        }
        if day.is_selected {
            style = style.patch(self.palette.selected);
        }
        let s = if day.is_today {
            format!("[{:2}]", day.day())
        } else {
            format!(" {:2} ", day.day())
        };
        let dot = if day.has_tasks {
            Span::styled(TASK_DOT, self.palette.dot)
        } else {
            Span::styled(" ", self.palette.base)
        };
        Line::from(vec![Span::styled(s, style), dot])
    }
}

impl Widget for Calendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([Constraint::Length(MAIN_WIDTH)])
            .flex(Flex::Center)
            .areas(area);
        buf.set_style(area, self.palette.base);
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(&self.grid.month().to_string(), self.palette.heading);
        canvas.draw_header(self.palette.heading);
        for (week_no, week) in std::iter::zip(0u16.., self.grid.weeks()) {
            for (wd, cell) in std::iter::zip(0u16.., week) {
                if let GridCell::Day(day) = cell {
                    canvas.draw_day(week_no, wd, self.day_spans(day));
                }
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, title: &str, style: Style) {
        let width = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);
        let x = MAIN_WIDTH.saturating_sub(width) / 2;
        self.mvprint(0, x, Line::styled(title, style));
    }

    fn draw_header(&mut self, style: Style) {
        for (i, wd) in std::iter::zip(0u16.., WEEKDAYS) {
            self.mvprint(1, DAY_WIDTH * i + 1, Line::styled(wd, style));
        }
        self.hline(2, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, wd: u16, line: Line<'_>) {
        self.mvprint(week_no * WEEK_LINES + HEADER_LINES, DAY_WIDTH * wd, line);
    }

    fn mvprint(&mut self, y: u16, x: u16, line: Line<'_>) {
        if y < self.area.height && x < self.area.width {
            let width = u16::try_from(line.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(Text::from(line)).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, Line::raw(String::from(ch).repeat(length.into())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{month_grid, HasTasks};
    use crate::dates::{DateKey, YearMonth};
    use crate::testing::buffer_lines;
    use crate::theme::LIGHT;
    use ratatui::style::Modifier;
    use time::{macros::date, Month};

    struct Dotted(Vec<DateKey>);

    impl HasTasks for Dotted {
        fn has_tasks(&self, key: &DateKey) -> bool {
            self.0.contains(key)
        }
    }

    #[test]
    fn test_render_march_2024() {
        let tasks = Dotted(vec![
            DateKey::from(date!(2024 - 03 - 01)),
            DateKey::from(date!(2024 - 03 - 20)),
        ]);
        let grid = month_grid(
            YearMonth::new(2024, Month::March),
            date!(2024 - 03 - 15),
            date!(2024 - 03 - 20),
            &tasks,
        );
        let area = Rect::new(0, 0, 42, 14);
        let mut buffer = Buffer::empty(area);
        Calendar::new(&grid, &LIGHT).render(area, &mut buffer);
        assert_eq!(
            buffer_lines(&buffer),
            [
                "                March 2024                ",
                " Su    Mo    Tu    We    Th    Fr    Sa   ",
                "──────────────────────────────────────────",
                "                                1 •   2   ",
                "                                          ",
                "  3     4     5     6     7     8     9   ",
                "                                          ",
                " 10    11    12    13    14   [15]   16   ",
                "                                          ",
                " 17    18    19    20 •  21    22    23   ",
                "                                          ",
                " 24    25    26    27    28    29    30   ",
                "                                          ",
                " 31                                       ",
            ]
        );
        // The selected day:
        assert!(buffer[(19, 9)].modifier.contains(Modifier::REVERSED));
        assert!(!buffer[(25, 9)].modifier.contains(Modifier::REVERSED));
        // Today:
        assert_eq!(Some(buffer[(31, 7)].fg), LIGHT.today.fg);
        // A task dot:
        assert_eq!(Some(buffer[(22, 9)].fg), LIGHT.dot.fg);
    }

    #[test]
    fn test_render_centered_and_truncated() {
        let grid = month_grid(
            YearMonth::new(2024, Month::September),
            date!(2024 - 03 - 15),
            date!(2024 - 09 - 01),
            &Dotted(Vec::new()),
        );
        let area = Rect::new(0, 0, 46, 4);
        let mut buffer = Buffer::empty(area);
        Calendar::new(&grid, &LIGHT).render(area, &mut buffer);
        assert_eq!(
            buffer_lines(&buffer),
            [
                "                September 2024                ",
                "   Su    Mo    Tu    We    Th    Fr    Sa     ",
                "  ──────────────────────────────────────────  ",
                "    1     2     3     4     5     6     7     ",
            ]
        );
        assert!(buffer[(3, 3)].modifier.contains(Modifier::REVERSED));
    }
}
