//! Palette loading from TOML.

use anyhow::Result;
use ratatui::style::Color;
use serde::Deserialize;

use crate::Theme;

/// Color representation in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TomlColor {
    Named(String),
    Rgb { rgb: [u8; 3] },
}

impl TomlColor {
    fn to_color(&self) -> Color {
        match self {
            TomlColor::Named(name) => match name.as_str() {
                "Black" => Color::Black,
                "Red" => Color::Red,
                "Green" => Color::Green,
                "Yellow" => Color::Yellow,
                "Blue" => Color::Blue,
                "Magenta" => Color::Magenta,
                "Cyan" => Color::Cyan,
                "Gray" => Color::Gray,
                "DarkGray" => Color::DarkGray,
                "LightRed" => Color::LightRed,
                "White" => Color::White,
                _ => Color::Reset,
            },
            TomlColor::Rgb { rgb } => Color::Rgb(rgb[0], rgb[1], rgb[2]),
        }
    }
}

/// TOML palette colors structure.
#[derive(Debug, Clone, Deserialize)]
struct TomlColors {
    bg: TomlColor,
    fg: TomlColor,
    gutter_fg: TomlColor,
    cursor_line_bg: TomlColor,
    selected_bg: TomlColor,
    selected_fg: TomlColor,
    status_bg: TomlColor,
    status_fg: TomlColor,
    accent: TomlColor,
    error: TomlColor,
}

/// TOML palette structure.
#[derive(Debug, Clone, Deserialize)]
struct TomlTheme {
    colors: TomlColors,
}

/// Load palette from TOML string with a static name.
pub fn load_theme_from_str(content: &str, name: &'static str) -> Result<Theme> {
    let toml_theme: TomlTheme = toml::from_str(content)?;
    let colors = toml_theme.colors;

    Ok(Theme {
        name,
        bg: colors.bg.to_color(),
        fg: colors.fg.to_color(),
        gutter_fg: colors.gutter_fg.to_color(),
        cursor_line_bg: colors.cursor_line_bg.to_color(),
        selected_bg: colors.selected_bg.to_color(),
        selected_fg: colors.selected_fg.to_color(),
        status_bg: colors.status_bg.to_color(),
        status_fg: colors.status_fg.to_color(),
        accent: colors.accent.to_color(),
        error: colors.error.to_color(),
    })
}
