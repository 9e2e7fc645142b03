//! Theme configuration and status color resolution.
//!
//! Supports light and dark themes with automatic terminal detection. The
//! active theme is re-read from the settings store on every resolution so
//! a theme change takes effect on the next draw without replumbing.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::HealthResult;
use crate::settings::SettingsStore;

/// Theme name applied when the stored name matches no known theme.
pub const DEFAULT_THEME: &str = "dark";

/// Color and style theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Name this theme is stored and looked up under.
    pub name: &'static str,
    /// Logical state name to display color. States outside this table
    /// resolve to [`Theme::invalid`].
    state_colors: &'static [(&'static str, Color)],
    /// Color for a state name the theme does not know.
    pub invalid: Color,
    /// Color for a missing result (no data yet).
    pub nodata: Color,
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            name: "dark",
            state_colors: &[
                ("healthy", Color::Green),
                ("unhealthy", Color::Red),
                ("degraded", Color::Yellow),
            ],
            invalid: Color::Magenta,
            nodata: Color::DarkGray,
            highlight: Color::Cyan,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            name: "light",
            state_colors: &[
                ("healthy", Color::Green),
                ("unhealthy", Color::Red),
                ("degraded", Color::Yellow),
            ],
            invalid: Color::Magenta,
            nodata: Color::Gray,
            highlight: Color::Blue,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Look up a theme by its stored name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// The active theme per the settings store, falling back to the
    /// dark-mode flag (and ultimately [`DEFAULT_THEME`]) when the stored
    /// name is unknown. Read on every call; the store is the single
    /// source of truth.
    pub fn active(store: &SettingsStore) -> Self {
        match store.theme_name().and_then(Self::by_name) {
            Some(theme) => theme,
            None if store.dark_mode() => Self::dark(),
            None => Self::light(),
        }
    }

    /// Color for a logical state name.
    pub fn state_color(&self, state: &str) -> Color {
        self.state_colors
            .iter()
            .find(|(name, _)| *name == state)
            .map(|(_, color)| *color)
            .unwrap_or(self.invalid)
    }

    /// Color for a health-check result. A missing result renders in the
    /// no-data color; otherwise the result's explicit state, or one
    /// derived from its success flag, is looked up in the theme's table.
    pub fn result_color(&self, result: Option<&HealthResult>) -> Color {
        match result {
            None => self.nodata,
            Some(result) => self.state_color(result.state_name()),
        }
    }

    /// Style for a logical state name.
    pub fn state_style(&self, state: &str) -> Style {
        let style = Style::default().fg(self.state_color(state));
        if state == "unhealthy" {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}
