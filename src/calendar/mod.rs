mod grid;
mod widget;
pub(crate) use self::grid::{month_grid, MonthGrid};
pub(crate) use self::widget::Calendar;
use crate::dates::DateKey;

/// Tells the calendar which days to mark as having tasks
pub(crate) trait HasTasks {
    fn has_tasks(&self, key: &DateKey) -> bool;
}
