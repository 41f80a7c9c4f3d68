use super::HasTasks;
use crate::dates::{DateKey, YearMonth};
use std::iter::successors;
use std::slice::Chunks;
use time::Date;

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// A day of the displayed month, with everything needed to draw it
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    pub(crate) is_today: bool,
    pub(crate) is_selected: bool,
    pub(crate) has_tasks: bool,
}

impl DayCell {
    pub(crate) fn day(&self) -> u8 {
        self.date.day()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GridCell {
    /// Padding before the first of the month
    Blank,
    Day(DayCell),
}

/// The cells of a month laid out Sunday-first, seven to a row.
///
/// The grid starts with one blank cell per weekday preceding the first of the
/// month and then holds one cell per day of the month; trailing cells of the
/// last week are not padded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    month: YearMonth,
    cells: Vec<GridCell>,
}

impl MonthGrid {
    pub(crate) fn month(&self) -> YearMonth {
        self.month
    }

    #[cfg(test)]
    pub(crate) fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    #[cfg(test)]
    pub(crate) fn leading_blanks(&self) -> usize {
        self.cells
            .iter()
            .take_while(|c| matches!(c, GridCell::Blank))
            .count()
    }

    #[cfg(test)]
    pub(crate) fn days(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.cells.iter().filter_map(|c| match c {
            GridCell::Day(day) => Some(day),
            GridCell::Blank => None,
        })
    }

    pub(crate) fn weeks(&self) -> Chunks<'_, GridCell> {
        self.cells.chunks(DAYS_IN_WEEK)
    }
}

/// Lay out `month`, marking `today`, `selected`, and the days for which
/// `tasks` has entries
pub(crate) fn month_grid<T: HasTasks>(
    month: YearMonth,
    today: Date,
    selected: Date,
    tasks: &T,
) -> MonthGrid {
    let Some(first) = month.first_day() else {
        return MonthGrid {
            month,
            cells: Vec::new(),
        };
    };
    let today = DateKey::from(today);
    let selected = DateKey::from(selected);
    let leading = usize::from(first.weekday().number_days_from_sunday());
    let mut cells = Vec::with_capacity(leading + usize::from(month.days()));
    cells.extend(std::iter::repeat(GridCell::Blank).take(leading));
    for date in successors(Some(first), |d| d.next_day()).take(usize::from(month.days())) {
        let key = DateKey::from(date);
        cells.push(GridCell::Day(DayCell {
            date,
            is_today: key == today,
            is_selected: key == selected,
            has_tasks: tasks.has_tasks(&key),
        }));
    }
    MonthGrid { month, cells }
}
