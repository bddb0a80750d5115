use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::calendar::Category;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme built from config. Only the first call has an effect.
pub fn init(config: &ThemeConfig) {
    let _ = THEME.set(config.clone().into_theme());
}

/// Get the active theme, falling back to the default when `init` was never called.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    pub categories: CategoryPalette,
}

#[derive(Debug, Clone, Copy)]
pub struct CategoryPalette {
    pub work: Color,
    pub personal: Color,
    pub study: Color,
    pub urgent: Color,
    pub holiday: Color,
    pub default: Color,
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self {
            work: Color::Rgb(255, 140, 0),
            personal: Color::Rgb(106, 90, 205),
            study: Color::Rgb(32, 178, 170),
            urgent: Color::Rgb(220, 20, 60),
            holiday: Color::Rgb(0, 128, 0),
            default: Color::Rgb(153, 153, 153),
        }
    }
}

impl CategoryPalette {
    pub fn color(&self, category: Category) -> Color {
        match category {
            Category::Work => self.work,
            Category::Personal => self.personal,
            Category::Study => self.study,
            Category::Urgent => self.urgent,
            Category::Holiday => self.holiday,
            Category::Default => self.default,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            highlight: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            categories: CategoryPalette::default(),
        }
    }
}

impl Theme {
    pub fn category(&self, category: Category) -> Color {
        self.categories.color(category)
    }

    /// Style for a grid cell that is both today and selected.
    pub fn today_selected(&self) -> Style {
        self.selected.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    /// Get a built-in preset by name.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Self::dracula(),
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            _ => Self::default(),
        }
    }

    fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(189, 147, 249)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(139, 233, 253)),
            header: Style::default().fg(Color::Rgb(248, 248, 242)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(98, 114, 164)),
            border: Style::default().fg(Color::Rgb(68, 71, 90)),
            status: Style::default()
                .fg(Color::Rgb(248, 248, 242))
                .bg(Color::Rgb(68, 71, 90)),
            highlight: Style::default()
                .bg(Color::Rgb(68, 71, 90))
                .add_modifier(Modifier::BOLD),
            categories: CategoryPalette {
                work: Color::Rgb(255, 184, 108),
                personal: Color::Rgb(189, 147, 249),
                study: Color::Rgb(139, 233, 253),
                urgent: Color::Rgb(255, 85, 85),
                holiday: Color::Rgb(80, 250, 123),
                default: Color::Rgb(98, 114, 164),
            },
        }
    }

    fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(250, 189, 47)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(131, 165, 152)),
            header: Style::default().fg(Color::Rgb(235, 219, 178)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(146, 131, 116)),
            border: Style::default().fg(Color::Rgb(102, 92, 84)),
            status: Style::default()
                .fg(Color::Rgb(235, 219, 178))
                .bg(Color::Rgb(80, 73, 69)),
            highlight: Style::default()
                .bg(Color::Rgb(80, 73, 69))
                .add_modifier(Modifier::BOLD),
            categories: CategoryPalette {
                work: Color::Rgb(254, 128, 25),
                personal: Color::Rgb(211, 134, 155),
                study: Color::Rgb(142, 192, 124),
                urgent: Color::Rgb(251, 73, 52),
                holiday: Color::Rgb(184, 187, 38),
                default: Color::Rgb(146, 131, 116),
            },
        }
    }

    fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(235, 203, 139)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(136, 192, 208)),
            header: Style::default().fg(Color::Rgb(229, 233, 240)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(Color::Rgb(67, 76, 94)),
            status: Style::default()
                .fg(Color::Rgb(229, 233, 240))
                .bg(Color::Rgb(67, 76, 94)),
            highlight: Style::default()
                .bg(Color::Rgb(67, 76, 94))
                .add_modifier(Modifier::BOLD),
            categories: CategoryPalette {
                work: Color::Rgb(208, 135, 112),
                personal: Color::Rgb(180, 142, 173),
                study: Color::Rgb(143, 188, 187),
                urgent: Color::Rgb(191, 97, 106),
                holiday: Color::Rgb(163, 190, 140),
                default: Color::Rgb(76, 86, 106),
            },
        }
    }
}

// ── TOML config types ──

/// `[theme]` table of config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub preset: Option<String>,
    pub today_fg: Option<String>,
    pub today_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub selected_bg: Option<String>,
    pub header_fg: Option<String>,
    pub dim_fg: Option<String>,
    pub border_fg: Option<String>,
    pub status_fg: Option<String>,
    pub status_bg: Option<String>,
    pub highlight_bg: Option<String>,
    pub categories: CategoryColors,
}

/// `[theme.categories]`: one colour per event category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryColors {
    pub work: Option<String>,
    pub personal: Option<String>,
    pub study: Option<String>,
    pub urgent: Option<String>,
    pub holiday: Option<String>,
    pub default: Option<String>,
}

impl ThemeConfig {
    pub fn into_theme(self) -> Theme {
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        let fg = |style: Style, value: &Option<String>| match value.as_deref().and_then(parse_color) {
            Some(c) => style.fg(c),
            None => style,
        };
        let bg = |style: Style, value: &Option<String>| match value.as_deref().and_then(parse_color) {
            Some(c) => style.bg(c),
            None => style,
        };

        theme.today = bg(fg(theme.today, &self.today_fg), &self.today_bg);
        theme.selected = bg(fg(theme.selected, &self.selected_fg), &self.selected_bg);
        theme.header = fg(theme.header, &self.header_fg);
        theme.dim = fg(theme.dim, &self.dim_fg);
        theme.border = fg(theme.border, &self.border_fg);
        theme.status = bg(fg(theme.status, &self.status_fg), &self.status_bg);
        theme.highlight = bg(theme.highlight, &self.highlight_bg);

        let cats = &self.categories;
        let palette = &mut theme.categories;
        for (slot, value) in [
            (&mut palette.work, &cats.work),
            (&mut palette.personal, &cats.personal),
            (&mut palette.study, &cats.study),
            (&mut palette.urgent, &cats.urgent),
            (&mut palette.holiday, &cats.holiday),
            (&mut palette.default, &cats.default),
        ] {
            if let Some(c) = value.as_deref().and_then(parse_color) {
                *slot = c;
            }
        }

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(parse_color("#FF8C00"), Some(Color::Rgb(255, 140, 0)));
        assert_eq!(parse_color(" DarkGrey "), Some(Color::DarkGray));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn category_overrides_apply_on_top_of_preset() {
        let config = ThemeConfig {
            preset: Some("nord".to_string()),
            categories: CategoryColors {
                urgent: Some("red".to_string()),
                ..CategoryColors::default()
            },
            ..ThemeConfig::default()
        };
        let theme = config.into_theme();
        assert_eq!(theme.name, "nord");
        assert_eq!(theme.category(Category::Urgent), Color::Red);
        assert_eq!(theme.category(Category::Study), Color::Rgb(143, 188, 187));
    }

    #[test]
    fn default_palette_matches_category_colours() {
        let theme = Theme::default();
        assert_eq!(theme.category(Category::Work), Color::Rgb(255, 140, 0));
        assert_eq!(theme.category(Category::Default), Color::Rgb(153, 153, 153));
    }
}
