//! Editor palettes for sketchpad.
//!
//! The editor knows exactly two palettes, selected by the `editor_theme`
//! setting: `"light-theme"` and `"dark-theme"`. Any other selector is not a
//! palette and leaves the current one in place.

mod colors;
mod loader;

pub use colors::Theme;
pub use loader::load_theme_from_str;

use ratatui::style::Color;
use std::sync::OnceLock;

// Embed palette files at compile time
const THEME_P5_LIGHT_TOML: &str = include_str!("../themes/p5-light.toml");
const THEME_P5_DARK_TOML: &str = include_str!("../themes/p5-dark.toml");

// Static palette instances
static THEME_P5_LIGHT: OnceLock<Theme> = OnceLock::new();
static THEME_P5_DARK: OnceLock<Theme> = OnceLock::new();

/// Closed set of palettes the editor can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeKind {
    #[default]
    Light,
    Dark,
}

impl ThemeKind {
    /// Resolve a settings selector.
    ///
    /// Returns `None` for anything outside the closed set.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "light-theme" => Some(ThemeKind::Light),
            "dark-theme" => Some(ThemeKind::Dark),
            _ => None,
        }
    }

    /// Settings selector for this palette.
    pub fn selector(self) -> &'static str {
        match self {
            ThemeKind::Light => "light-theme",
            ThemeKind::Dark => "dark-theme",
        }
    }

    /// Palette colors.
    pub fn theme(self) -> &'static Theme {
        match self {
            ThemeKind::Light => THEME_P5_LIGHT
                .get_or_init(|| load_theme_from_toml(THEME_P5_LIGHT_TOML, "p5-light")),
            ThemeKind::Dark => {
                THEME_P5_DARK.get_or_init(|| load_theme_from_toml(THEME_P5_DARK_TOML, "p5-dark"))
            }
        }
    }
}

/// Hardcoded fallback palette in case of parse errors.
fn get_hardcoded_fallback_theme(name: &'static str) -> Theme {
    Theme {
        name,
        bg: Color::Black,
        fg: Color::White,
        gutter_fg: Color::DarkGray,
        cursor_line_bg: Color::Black,
        selected_bg: Color::Blue,
        selected_fg: Color::White,
        status_bg: Color::DarkGray,
        status_fg: Color::White,
        accent: Color::Magenta,
        error: Color::Red,
    }
}

/// Load palette from embedded TOML content.
fn load_theme_from_toml(content: &str, name: &'static str) -> Theme {
    match loader::load_theme_from_str(content, name) {
        Ok(theme) => theme,
        Err(e) => {
            log::error!(
                "Failed to parse built-in theme '{}': {}. Using fallback theme.",
                name,
                e
            );
            get_hardcoded_fallback_theme(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_closed_set() {
        assert_eq!(ThemeKind::from_selector("light-theme"), Some(ThemeKind::Light));
        assert_eq!(ThemeKind::from_selector("dark-theme"), Some(ThemeKind::Dark));
        assert_eq!(ThemeKind::from_selector("monokai"), None);
        assert_eq!(ThemeKind::from_selector(""), None);
    }

    #[test]
    fn test_selector_roundtrip() {
        for kind in [ThemeKind::Light, ThemeKind::Dark] {
            assert_eq!(ThemeKind::from_selector(kind.selector()), Some(kind));
        }
    }

    #[test]
    fn test_embedded_palettes_parse() {
        let light = ThemeKind::Light.theme();
        let dark = ThemeKind::Dark.theme();
        assert_eq!(light.name, "p5-light");
        assert_eq!(dark.name, "p5-dark");
        assert_eq!(light.bg, Color::Rgb(253, 253, 253));
        assert_ne!(light.bg, dark.bg);
    }
}
