use crate::storage::KeyValueStorage;
use crate::task::TaskColor;
use ratatui::style::{Color, Modifier, Style};

/// Storage key under which the chosen theme is kept
pub(crate) const THEME_KEY: &str = "glassTodoTheme";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Read the stored theme.  Anything other than "dark" means light.
    pub(crate) fn load<S: KeyValueStorage>(storage: &S) -> Theme {
        match storage.get_item(THEME_KEY).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub(crate) fn save<S: KeyValueStorage>(self, storage: &mut S) {
        if let Err(e) = storage.set_item(THEME_KEY, self.name().to_owned()) {
            log::warn!("Failed to save theme: {e}");
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub(crate) fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub(crate) fn palette(self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }
}

/// The styles every widget draws with
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Palette {
    pub(crate) base: Style,
    pub(crate) heading: Style,
    pub(crate) muted: Style,
    pub(crate) today: Style,
    pub(crate) selected: Style,
    pub(crate) dot: Style,
    pub(crate) pending: Style,
    pub(crate) completed: Style,
    pub(crate) cursor: Style,
    pub(crate) focused_border: Style,
    pub(crate) placeholder: Style,
    pub(crate) ready: Style,
}

const DARK_BASE: Style = Style::new().fg(Color::White).bg(Color::Black);

const LIGHT_BASE: Style = Style::new().fg(Color::Black).bg(Color::White);

pub(crate) static DARK: Palette = Palette {
    base: DARK_BASE,
    heading: DARK_BASE.add_modifier(Modifier::BOLD),
    muted: DARK_BASE.fg(Color::DarkGray),
    today: DARK_BASE.fg(Color::LightCyan).add_modifier(Modifier::BOLD),
    selected: DARK_BASE.add_modifier(Modifier::REVERSED),
    dot: DARK_BASE.fg(Color::LightYellow),
    pending: DARK_BASE.fg(Color::Yellow),
    completed: DARK_BASE.fg(Color::LightGreen),
    cursor: Style::new().bg(Color::DarkGray),
    focused_border: DARK_BASE.fg(Color::LightCyan),
    placeholder: DARK_BASE.fg(Color::DarkGray),
    ready: DARK_BASE.add_modifier(Modifier::UNDERLINED),
};

pub(crate) static LIGHT: Palette = Palette {
    base: LIGHT_BASE,
    heading: LIGHT_BASE.add_modifier(Modifier::BOLD),
    muted: LIGHT_BASE.fg(Color::Gray),
    today: LIGHT_BASE.fg(Color::Blue).add_modifier(Modifier::BOLD),
    selected: LIGHT_BASE.add_modifier(Modifier::REVERSED),
    dot: LIGHT_BASE.fg(Color::Magenta),
    pending: LIGHT_BASE.fg(Color::Rgb(0xb4, 0x53, 0x09)),
    completed: LIGHT_BASE.fg(Color::Green),
    cursor: Style::new().bg(Color::Indexed(253)),
    focused_border: LIGHT_BASE.fg(Color::Blue),
    placeholder: LIGHT_BASE.fg(Color::Gray),
    ready: LIGHT_BASE.add_modifier(Modifier::UNDERLINED),
};

/// Terminal color for a task's color tag.  Tags outside the palette get the
/// default (blue) presentation.
pub(crate) fn tag_color(color: &TaskColor) -> Color {
    match color {
        TaskColor::Blue | TaskColor::Other(_) => Color::Blue,
        TaskColor::Green => Color::Green,
        TaskColor::Purple => Color::Magenta,
        TaskColor::Orange => Color::Indexed(208),
        TaskColor::Red => Color::Red,
    }
}
