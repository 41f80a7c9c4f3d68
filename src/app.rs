use crate::calendar::{month_grid, Calendar, HasTasks, MonthGrid};
use crate::dates::{day_label, DateKey, YearMonth};
use crate::form::{FormInput, FormOutput, TaskForm, TaskFormState};
use crate::help::Help;
use crate::storage::KeyValueStorage;
use crate::store::TaskStore;
use crate::tasklist::{count_label, TaskAction, TaskList, TaskListState};
use crate::theme::Theme;
use crossterm::event::{poll, read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block, StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::{Date, Duration, OffsetDateTime};

/// Width of the calendar pane: the calendar itself plus the pane's borders
const CALENDAR_PANE_WIDTH: u16 = 44;

/// How long to wait for input before checking whether the date has changed
const CLOCK_TICK: std::time::Duration = std::time::Duration::from_secs(30);

static FOOTER: &str = " a add   TAB switch pane   p/n month   T theme   ? help   q quit";

/// Which month is shown and which day is selected
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ViewState {
    today: Date,
    current: YearMonth,
    selected: Date,
}

impl ViewState {
    /// Show the month of `start` with `start` selected
    pub(crate) fn new(today: Date, start: Date) -> ViewState {
        ViewState {
            today,
            current: YearMonth::of(start),
            selected: start,
        }
    }

    #[cfg(test)]
    pub(crate) fn current(&self) -> YearMonth {
        self.current
    }

    /// Move the "today" marker to `today`, as when the date changes while
    /// the calendar is open
    pub(crate) fn set_today(&mut self, today: Date) {
        self.today = today;
    }

    pub(crate) fn selected(&self) -> Date {
        self.selected
    }

    pub(crate) fn selected_key(&self) -> DateKey {
        DateKey::from(self.selected)
    }

    /// Show the month `delta` months away.  The selection is left alone.
    pub(crate) fn change_month(&mut self, delta: i32) {
        self.current = self.current.offset(delta);
    }

    pub(crate) fn select_date(&mut self, date: Date) {
        self.selected = date;
    }

    /// Select the day `days` days from the selected one, as long as that day
    /// is in the month being shown.  If the selection is not in the month
    /// being shown, the first of the month is selected instead.  Returns
    /// `false` if the selection did not change.
    pub(crate) fn move_selection(&mut self, days: i64) -> bool {
        if !self.current.contains(self.selected) {
            let Some(first) = self.current.first_day() else {
                return false;
            };
            self.select_date(first);
            return true;
        }
        match self.selected.checked_add(Duration::days(days)) {
            Some(date) if self.current.contains(date) => {
                self.select_date(date);
                true
            }
            _ => false,
        }
    }

    /// Show the current month with today selected
    pub(crate) fn go_to_today(&mut self) {
        self.current = YearMonth::of(self.today);
        self.select_date(self.today);
    }

    pub(crate) fn grid<T: HasTasks>(&self, tasks: &T) -> MonthGrid {
        month_grid(self.current, self.today, self.selected, tasks)
    }
}

#[derive(Debug)]
pub(crate) struct App<S> {
    store: TaskStore<S>,
    view: ViewState,
    theme: Theme,
    focus: Focus,
    tasks: TaskListState,
    state: AppState,
}

impl<S: KeyValueStorage> App<S> {
    pub(crate) fn new(storage: S, today: Date, start: Date) -> App<S> {
        let theme = Theme::load(&storage);
        let store = TaskStore::load(storage);
        App {
            store,
            view: ViewState::new(today, start),
            theme,
            focus: Focus::Calendar,
            tasks: TaskListState::default(),
            state: AppState::Browsing,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.refresh_today();
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn refresh_today(&mut self) {
        match OffsetDateTime::now_local() {
            Ok(now) => self.view.set_today(now.date()),
            Err(e) => log::debug!("Could not read the local date; keeping the old one: {e}"),
        }
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if !poll(CLOCK_TICK)? {
            // Nothing happened; redraw in case the date has changed
            return Ok(());
        }
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Browsing => self.handle_browsing_key(key),
            AppState::Helping => {
                self.state = AppState::Browsing;
                true
            }
            AppState::Adding(form) => {
                let output = match key {
                    KeyCode::Esc => {
                        self.state = AppState::Browsing;
                        return true;
                    }
                    KeyCode::Char(c) => form.handle_input(FormInput::Char(c)),
                    KeyCode::Backspace => form.handle_input(FormInput::Backspace),
                    KeyCode::Tab | KeyCode::Down => form.handle_input(FormInput::NextField),
                    KeyCode::BackTab | KeyCode::Up => form.handle_input(FormInput::PreviousField),
                    KeyCode::Left => form.handle_input(FormInput::Left),
                    KeyCode::Right => form.handle_input(FormInput::Right),
                    KeyCode::Enter => form.handle_input(FormInput::Submit),
                    _ => FormOutput::Invalid,
                };
                match output {
                    FormOutput::Ok => true,
                    FormOutput::Invalid => false,
                    FormOutput::Submit(task) => {
                        self.state = AppState::Browsing;
                        let key = self.view.selected_key();
                        self.store.add_task(&key, task.title, task.desc, task.color);
                        self.tasks.clamp(self.store.task_count(&key));
                        true
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn handle_browsing_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state = AppState::Quitting;
                true
            }
            KeyCode::Char('?') => {
                self.state = AppState::Helping;
                true
            }
            KeyCode::Char('a') => {
                self.state = AppState::Adding(TaskFormState::new());
                true
            }
            KeyCode::Char('T') => {
                self.toggle_theme();
                true
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self.focus.other();
                true
            }
            KeyCode::Char('p') | KeyCode::PageUp => {
                self.view.change_month(-1);
                true
            }
            KeyCode::Char('n') | KeyCode::PageDown => {
                self.view.change_month(1);
                true
            }
            KeyCode::Char('0') | KeyCode::Home => {
                self.view.go_to_today();
                self.tasks.reset();
                true
            }
            _ => match self.focus {
                Focus::Calendar => self.handle_calendar_key(key),
                Focus::Tasks => self.handle_tasks_key(key),
            },
        }
    }

    fn handle_calendar_key(&mut self, key: KeyCode) -> bool {
        let days = match key {
            KeyCode::Char('h') | KeyCode::Left => -1,
            KeyCode::Char('l') | KeyCode::Right => 1,
            KeyCode::Char('k') | KeyCode::Up => -7,
            KeyCode::Char('j') | KeyCode::Down => 7,
            _ => return false,
        };
        if self.view.move_selection(days) {
            self.tasks.reset();
            true
        } else {
            false
        }
    }

    fn handle_tasks_key(&mut self, key: KeyCode) -> bool {
        let day = self.view.selected_key();
        let len = self.store.task_count(&day);
        let action = match key {
            KeyCode::Char('j') | KeyCode::Down => return self.tasks.down(len),
            KeyCode::Char('k') | KeyCode::Up => return self.tasks.up(),
            KeyCode::Char(' ') | KeyCode::Enter => self.tasks.toggle(&day, len),
            KeyCode::Char('d') | KeyCode::Delete => self.tasks.delete(&day, len),
            KeyCode::Char('e') => return self.tasks.toggle_expanded(len),
            _ => None,
        };
        match action {
            Some(action) => self.apply(action),
            None => false,
        }
    }

    fn apply(&mut self, action: TaskAction) -> bool {
        let day = self.view.selected_key();
        let deleted = match action {
            TaskAction::Delete { index, .. } => Some(index),
            TaskAction::Toggle { .. } => None,
        };
        let applied = action.apply(&mut self.store);
        if let Some(index) = deleted.filter(|_| applied) {
            self.tasks.task_removed(index);
        }
        self.tasks.clamp(self.store.task_count(&day));
        applied
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.theme.save(self.store.storage_mut());
        log::info!("Switched to {} theme", self.theme.name());
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl<S> Widget for &mut App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = self.theme.palette();
        buf.set_style(area, palette.base);
        let [main_area, footer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        let [calendar_area, tasks_area] = Layout::horizontal([
            Constraint::Length(CALENDAR_PANE_WIDTH),
            Constraint::Min(0),
        ])
        .areas(main_area);

        let pane = |focus: Focus| {
            let block = Block::bordered().style(palette.base);
            if self.focus == focus {
                block.border_style(palette.focused_border)
            } else {
                block
            }
        };

        let calendar_block = pane(Focus::Calendar).title(" Calendar ");
        let calendar_inner = calendar_block.inner(calendar_area);
        calendar_block.render(calendar_area, buf);
        let grid = self.view.grid(&self.store);
        Calendar::new(&grid, palette).render(calendar_inner, buf);

        let day = self.view.selected_key();
        let tasks = self.store.tasks_for(&day);
        let label = day_label(self.view.selected());
        let tasks_block = pane(Focus::Tasks)
            .title(format!(" {label} "))
            .title(Line::from(format!(" {} ", count_label(tasks.len()))).right_aligned());
        let tasks_inner = tasks_block.inner(tasks_area);
        tasks_block.render(tasks_area, buf);
        TaskList::new(tasks, palette, self.focus == Focus::Tasks).render(
            tasks_inner,
            buf,
            &mut self.tasks,
        );

        Line::styled(FOOTER, palette.muted).render(footer_area, buf);

        match &mut self.state {
            AppState::Helping => Help::new(palette).render(area, buf),
            AppState::Adding(form) => TaskForm::new(&label, palette).render(area, buf, form),
            AppState::Browsing | AppState::Quitting => (),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Focus {
    Calendar,
    Tasks,
}

impl Focus {
    fn other(self) -> Focus {
        match self {
            Focus::Calendar => Focus::Tasks,
            Focus::Tasks => Focus::Calendar,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Browsing,
    Helping,
    Adding(TaskFormState),
    Quitting,
}
