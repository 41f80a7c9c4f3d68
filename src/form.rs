use crate::task::TaskColor;
use crate::popup::open_popup;
use crate::theme::{tag_color, Palette};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Margin, Rect},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, StatefulWidget, Widget},
};

const OUTER_WIDTH: u16 = 50;
const OUTER_HEIGHT: u16 = 12;

/// Columns taken up by a field's label, "Description: " being the longest
const LABEL_WIDTH: usize = 13;

/// Width available for the field values inside the form
const VALUE_WIDTH: usize = (OUTER_WIDTH as usize) - 6 - LABEL_WIDTH - 1;

const CURSOR: &str = "_";

/// Pop-up form for entering a new task
#[derive(Clone, Copy, Debug)]
pub(crate) struct TaskForm<'a> {
    day_label: &'a str,
    palette: &'a Palette,
}

impl<'a> TaskForm<'a> {
    pub(crate) fn new(day_label: &'a str, palette: &'a Palette) -> Self {
        TaskForm { day_label, palette }
    }
}

impl StatefulWidget for TaskForm<'_> {
    type State = TaskFormState;

    /*
     * ..................................................
     * .┌──────── New task · Friday, Mar 15 ───────────┐.
     * .│                                              │.
     * .│ Title:       Buy milk_                       │.
     * .│ Description: (optional)                      │.
     * .│ Color:       blue green purple orange red    │.
     * .│                                              │.
     * .│       [ENTER] Save   [TAB] Next field        │.
     * .│                 [ESC] Cancel                 │.
     * .│                                              │.
     * .└──────────────────────────────────────────────┘.
     * ..................................................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let outer_area = open_popup(area, OUTER_WIDTH, OUTER_HEIGHT, self.palette.base, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(format!(" New task · {} ", self.day_label))
            .title_alignment(Alignment::Center)
            .style(self.palette.base)
            .render(block_area, buf);
        // Inside the border: a blank row at the top and a blank column at
        // the left, as in the diagram above
        let text_area = block_area.inner(Margin::new(2, 2));
        state.to_text(self.palette).render(text_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Field {
    #[default]
    Title,
    Description,
    Color,
}

impl Field {
    fn next(self) -> Field {
        match self {
            Field::Title => Field::Description,
            Field::Description => Field::Color,
            Field::Color => Field::Title,
        }
    }

    fn previous(self) -> Field {
        match self {
            Field::Title => Field::Color,
            Field::Description => Field::Title,
            Field::Color => Field::Description,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Field::Title => "Title:",
            Field::Description => "Description:",
            Field::Color => "Color:",
        }
    }
}

/// Contents of the new-task form.  A fresh form has empty text fields and
/// the default color.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct TaskFormState {
    title: String,
    desc: String,
    color: TaskColor,
    field: Field,
}

impl TaskFormState {
    pub(crate) fn new() -> TaskFormState {
        TaskFormState::default()
    }

    fn to_text(&self, palette: &Palette) -> Text<'static> {
        let mut lines = vec![
            self.text_line(Field::Title, &self.title, "(untitled)", palette),
            self.text_line(Field::Description, &self.desc, "(optional)", palette),
            self.color_line(palette),
            Line::styled("", palette.base),
        ];
        lines.push(
            Line::from(vec![
                Span::styled("[ENTER]", palette.ready),
                Span::styled(" Save   ", palette.base),
                Span::styled("[TAB]", palette.heading),
                Span::styled(" Next field", palette.base),
            ])
            .centered(),
        );
        lines.push(
            Line::from(vec![
                Span::styled("[ESC]", palette.heading),
                Span::styled(" Cancel", palette.base),
            ])
            .centered(),
        );
        Text::from(lines)
    }

    fn label_span(&self, field: Field, palette: &Palette) -> Span<'static> {
        let style = if self.field == field {
            palette.heading
        } else {
            palette.base
        };
        Span::styled(format!("{:<LABEL_WIDTH$}", field.label()), style)
    }

    fn text_line(
        &self,
        field: Field,
        value: &str,
        placeholder: &'static str,
        palette: &Palette,
    ) -> Line<'static> {
        let mut spans = vec![self.label_span(field, palette)];
        if self.field == field {
            spans.push(Span::styled(
                tail(value, VALUE_WIDTH - CURSOR.len()).to_owned(),
                palette.base,
            ));
            spans.push(Span::styled(CURSOR, palette.ready));
        } else if value.is_empty() {
            spans.push(Span::styled(placeholder, palette.placeholder));
        } else {
            spans.push(Span::styled(tail(value, VALUE_WIDTH).to_owned(), palette.base));
        }
        Line::from(spans)
    }

    fn color_line(&self, palette: &Palette) -> Line<'static> {
        let mut spans = vec![self.label_span(Field::Color, palette)];
        let mut first = true;
        for color in TaskColor::PALETTE {
            if !std::mem::replace(&mut first, false) {
                spans.push(Span::styled(" ", palette.base));
            }
            let mut style = palette.base.fg(tag_color(&color));
            if color == self.color {
                style = style.add_modifier(Modifier::REVERSED);
                if self.field == Field::Color {
                    style = style.add_modifier(Modifier::BOLD);
                }
            }
            spans.push(Span::styled(color.name().to_owned(), style));
        }
        Line::from(spans)
    }

    pub(crate) fn handle_input(&mut self, input: FormInput) -> FormOutput {
        match (input, self.field) {
            (FormInput::Char(c), Field::Title) => {
                self.title.push(c);
                FormOutput::Ok
            }
            (FormInput::Char(c), Field::Description) => {
                self.desc.push(c);
                FormOutput::Ok
            }
            (FormInput::Backspace, Field::Title) => popped(self.title.pop()),
            (FormInput::Backspace, Field::Description) => popped(self.desc.pop()),
            (FormInput::NextField, _) => {
                self.field = self.field.next();
                FormOutput::Ok
            }
            (FormInput::PreviousField, _) => {
                self.field = self.field.previous();
                FormOutput::Ok
            }
            (FormInput::Left, Field::Color) => {
                self.color = self.color.previous();
                FormOutput::Ok
            }
            (FormInput::Right, Field::Color) => {
                self.color = self.color.next();
                FormOutput::Ok
            }
            (FormInput::Submit, _) => {
                let TaskFormState {
                    title, desc, color, ..
                } = std::mem::take(self);
                FormOutput::Submit(NewTask { title, desc, color })
            }
            _ => FormOutput::Invalid,
        }
    }
}

fn popped(c: Option<char>) -> FormOutput {
    if c.is_some() {
        FormOutput::Ok
    } else {
        FormOutput::Invalid
    }
}

/// The last `max` characters of `s`
fn tail(s: &str, max: usize) -> &str {
    let count = s.chars().count();
    if count <= max {
        s
    } else {
        s.char_indices()
            .nth(count - max)
            .map_or(s, |(i, _)| &s[i..])
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FormInput {
    Char(char),
    Backspace,
    NextField,
    PreviousField,
    Left,
    Right,
    Submit,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FormOutput {
    Ok,
    Invalid,
    Submit(NewTask),
}

/// The fields of a submitted form
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct NewTask {
    pub(crate) title: String,
    pub(crate) desc: String,
    pub(crate) color: TaskColor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::buffer_lines;
    use crate::theme::LIGHT;

    fn type_str(form: &mut TaskFormState, s: &str) {
        for c in s.chars() {
            assert_eq!(form.handle_input(FormInput::Char(c)), FormOutput::Ok);
        }
    }

    #[test]
    fn test_fill_and_submit() {
        let mut form = TaskFormState::new();
        type_str(&mut form, "Buy milkk");
        assert_eq!(form.handle_input(FormInput::Backspace), FormOutput::Ok);
        assert_eq!(form.handle_input(FormInput::NextField), FormOutput::Ok);
        type_str(&mut form, "2%");
        assert_eq!(form.handle_input(FormInput::NextField), FormOutput::Ok);
        assert_eq!(form.handle_input(FormInput::Right), FormOutput::Ok);
        assert_eq!(form.handle_input(FormInput::Right), FormOutput::Ok);
        assert_eq!(
            form.handle_input(FormInput::Submit),
            FormOutput::Submit(NewTask {
                title: "Buy milk".into(),
                desc: "2%".into(),
                color: TaskColor::Purple,
            })
        );
        assert_eq!(form, TaskFormState::new());
    }

    #[test]
    fn test_submit_untouched_form() {
        let mut form = TaskFormState::new();
        assert_eq!(
            form.handle_input(FormInput::Submit),
            FormOutput::Submit(NewTask {
                title: String::new(),
                desc: String::new(),
                color: TaskColor::Blue,
            })
        );
    }

    #[test]
    fn test_invalid_inputs() {
        let mut form = TaskFormState::new();
        assert_eq!(form.handle_input(FormInput::Backspace), FormOutput::Invalid);
        assert_eq!(form.handle_input(FormInput::Left), FormOutput::Invalid);
        assert_eq!(form.handle_input(FormInput::PreviousField), FormOutput::Ok);
        assert_eq!(form.handle_input(FormInput::Char('x')), FormOutput::Invalid);
        assert_eq!(form.handle_input(FormInput::Backspace), FormOutput::Invalid);
        assert_eq!(form.handle_input(FormInput::Left), FormOutput::Ok);
        assert_eq!(form.color, TaskColor::Red);
    }

    #[test]
    fn test_tail() {
        assert_eq!(tail("abc", 5), "abc");
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("żółw", 2), "łw");
    }

    #[test]
    fn test_render() {
        let mut form = TaskFormState::new();
        type_str(&mut form, "Buy milk");
        let area = Rect::new(0, 0, 60, 16);
        let mut buffer = Buffer::empty(area);
        TaskForm::new("Friday, Mar 15", &LIGHT).render(area, &mut buffer, &mut form);
        let lines = buffer_lines(&buffer);
        assert_eq!(lines[0].trim(), "");
        assert!(lines[3].contains(" New task · Friday, Mar 15 "));
        assert!(lines[5].contains("│ Title:       Buy milk_"));
        assert!(lines[6].contains("│ Description: (optional)"));
        assert!(lines[7].contains("│ Color:       blue green purple orange red"));
        assert!(lines[9].contains("[ENTER] Save   [TAB] Next field"));
        assert!(lines[10].contains("[ESC] Cancel"));
        assert!(lines[11].starts_with("      │ "));
        assert!(lines[12].contains("└"));
        assert_eq!(lines[13].trim(), "");
    }
}
