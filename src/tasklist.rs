use crate::dates::DateKey;
use crate::storage::KeyValueStorage;
use crate::store::TaskStore;
use crate::task::Task;
use crate::theme::{tag_color, Palette};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};
use std::collections::BTreeSet;

static EMPTY_MESSAGE: &str = "No tasks for this day";

const TAG_MARKER: &str = "▌ ";

/// Width of the status badge column: the length of "Completed"
const BADGE_WIDTH: usize = 9;

/// Indentation of description lines, so that they line up with the title
const DESC_INDENT: usize = 12;

/// Appended to a collapsed description that has more lines
const MORE_MARKER: &str = " …";

pub(crate) fn count_label(n: usize) -> String {
    if n == 1 {
        String::from("1 Task")
    } else {
        format!("{n} Tasks")
    }
}

/// Something to do to one task of the list currently on screen.
///
/// An action names its task by day and by position at the moment the action
/// was made, and is meant to be applied right away; it must not be kept
/// across any other change to the store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum TaskAction {
    Toggle { key: DateKey, index: usize },
    Delete { key: DateKey, index: usize },
}

impl TaskAction {
    /// Returns `false` if the task no longer exists
    pub(crate) fn apply<S: KeyValueStorage>(self, store: &mut TaskStore<S>) -> bool {
        match self {
            TaskAction::Toggle { key, index } => store.toggle_status(&key, index),
            TaskAction::Delete { key, index } => store.delete_task(&key, index).is_some(),
        }
    }
}

/// Cursor and scroll position of the task list
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct TaskListState {
    list: ListState,
    /// Positions of the tasks whose whole description is shown
    expanded: BTreeSet<usize>,
}

impl TaskListState {
    pub(crate) fn cursor(&self) -> usize {
        self.list.selected().unwrap_or(0)
    }

    /// Put the cursor back on the first task, as when another day is shown
    pub(crate) fn reset(&mut self) {
        self.list = ListState::default();
        self.expanded.clear();
    }

    /// Keep the cursor on a task after the list has changed to `len` tasks
    pub(crate) fn clamp(&mut self, len: usize) {
        let cursor = self.cursor().min(len.saturating_sub(1));
        self.list.select(Some(cursor));
    }

    pub(crate) fn down(&mut self, len: usize) -> bool {
        if self.cursor() + 1 < len {
            self.list.select(Some(self.cursor() + 1));
            true
        } else {
            false
        }
    }

    pub(crate) fn up(&mut self) -> bool {
        match self.cursor().checked_sub(1) {
            Some(c) => {
                self.list.select(Some(c));
                true
            }
            None => false,
        }
    }

    /// Show or hide the full description of the task under the cursor.
    /// Returns `false` if the list, which holds `len` tasks, is empty.
    pub(crate) fn toggle_expanded(&mut self, len: usize) -> bool {
        let index = self.cursor();
        if index >= len {
            return false;
        }
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
        true
    }

    pub(crate) fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    /// Note that the task at `index` was deleted, so that later tasks keep
    /// their expansion
    pub(crate) fn task_removed(&mut self, index: usize) {
        self.expanded = std::mem::take(&mut self.expanded)
            .into_iter()
            .filter(|&i| i != index)
            .map(|i| if i > index { i - 1 } else { i })
            .collect();
    }

    /// An action toggling the task under the cursor in the list for `key`,
    /// which currently holds `len` tasks
    pub(crate) fn toggle(&self, key: &DateKey, len: usize) -> Option<TaskAction> {
        let index = self.cursor();
        (index < len).then(|| TaskAction::Toggle {
            key: key.clone(),
            index,
        })
    }

    /// An action deleting the task under the cursor in the list for `key`,
    /// which currently holds `len` tasks
    pub(crate) fn delete(&self, key: &DateKey, len: usize) -> Option<TaskAction> {
        let index = self.cursor();
        (index < len).then(|| TaskAction::Delete {
            key: key.clone(),
            index,
        })
    }
}

/// The tasks of one day, in stored order, each with its color tag, status
/// badge, title, and any description.  A description is cut to its first
/// line unless its task is expanded.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TaskList<'a> {
    tasks: &'a [Task],
    palette: &'a Palette,
    focused: bool,
}

impl<'a> TaskList<'a> {
    pub(crate) fn new(tasks: &'a [Task], palette: &'a Palette, focused: bool) -> Self {
        TaskList {
            tasks,
            palette,
            focused,
        }
    }

    fn item(&self, task: &'a Task, expanded: bool) -> ListItem<'a> {
        let (badge_style, title_style) = if task.is_completed() {
            (
                self.palette.completed,
                self.palette.muted.add_modifier(Modifier::CROSSED_OUT),
            )
        } else {
            (self.palette.pending, self.palette.base)
        };
        let mut lines = vec![Line::from(vec![
            Span::styled(TAG_MARKER, Style::new().fg(tag_color(&task.color))),
            Span::styled(
                format!("{:<BADGE_WIDTH$}", task.status.label()),
                badge_style,
            ),
            Span::raw(" "),
            Span::styled(task.title.as_str(), title_style),
        ])];
        let mut desc = task.desc.lines();
        let shown = if expanded {
            desc.by_ref().collect::<Vec<_>>()
        } else {
            desc.next().into_iter().collect()
        };
        let hidden = desc.next().is_some();
        for ln in shown {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(DESC_INDENT)),
                Span::styled(ln, self.palette.muted),
            ]));
        }
        if hidden {
            if let Some(last) = lines.last_mut() {
                last.push_span(Span::styled(MORE_MARKER, self.palette.muted));
            }
        }
        ListItem::new(lines)
    }
}

impl StatefulWidget for TaskList<'_> {
    type State = TaskListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        buf.set_style(area, self.palette.base);
        if self.tasks.is_empty() {
            Paragraph::new(EMPTY_MESSAGE)
                .style(self.palette.muted)
                .alignment(Alignment::Center)
                .render(area, buf);
            return;
        }
        state.clamp(self.tasks.len());
        let items = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| self.item(t, state.is_expanded(i)))
            .collect::<Vec<_>>();
        let mut list = List::new(items).style(self.palette.base);
        if self.focused {
            list = list.highlight_style(self.palette.cursor);
        }
        StatefulWidget::render(list, area, buf, &mut state.list);
    }
}
