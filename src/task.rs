use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single entry in a day's task list.  Tasks have no identity beyond their
/// position in their day's list.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Task {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) desc: String,
    #[serde(default)]
    pub(crate) color: TaskColor,
    pub(crate) status: TaskStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,
}

impl Task {
    pub(crate) fn new(
        title: String,
        desc: String,
        color: TaskColor,
        created_at: OffsetDateTime,
    ) -> Task {
        Task {
            title,
            desc,
            color,
            status: TaskStatus::Pending,
            created_at,
        }
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    pub(crate) fn toggled(self) -> TaskStatus {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }

    /// Text of the status badge
    pub(crate) fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }
}

/// Color tag of a task.
///
/// Tags outside the palette are kept as-is so that they survive a
/// load/save cycle; they are drawn like the default color.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub(crate) enum TaskColor {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Other(String),
}

impl TaskColor {
    pub(crate) const PALETTE: [TaskColor; 5] = [
        TaskColor::Blue,
        TaskColor::Green,
        TaskColor::Purple,
        TaskColor::Orange,
        TaskColor::Red,
    ];

    pub(crate) fn name(&self) -> &str {
        match self {
            TaskColor::Blue => "blue",
            TaskColor::Green => "green",
            TaskColor::Purple => "purple",
            TaskColor::Orange => "orange",
            TaskColor::Red => "red",
            TaskColor::Other(s) => s,
        }
    }

    fn palette_index(&self) -> Option<usize> {
        TaskColor::PALETTE.iter().position(|c| c == self)
    }

    /// The palette entry after this one, wrapping around.  Tags outside the
    /// palette move to the first entry.
    pub(crate) fn next(&self) -> TaskColor {
        let i = self.palette_index().map_or(0, |i| (i + 1) % TaskColor::PALETTE.len());
        TaskColor::PALETTE[i].clone()
    }

    /// The palette entry before this one, wrapping around.  Tags outside the
    /// palette move to the last entry.
    pub(crate) fn previous(&self) -> TaskColor {
        let len = TaskColor::PALETTE.len();
        let i = self.palette_index().map_or(len - 1, |i| (i + len - 1) % len);
        TaskColor::PALETTE[i].clone()
    }
}

impl From<String> for TaskColor {
    fn from(s: String) -> TaskColor {
        match s.as_str() {
            "blue" => TaskColor::Blue,
            "green" => TaskColor::Green,
            "purple" => TaskColor::Purple,
            "orange" => TaskColor::Orange,
            "red" => TaskColor::Red,
            _ => TaskColor::Other(s),
        }
    }
}

impl From<TaskColor> for String {
    fn from(color: TaskColor) -> String {
        match color {
            TaskColor::Other(s) => s,
            c => c.name().to_owned(),
        }
    }
}
