//! Palette definitions.

use ratatui::style::Color;

/// Editor palette with semantic color assignments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Palette name for display
    pub name: &'static str,

    // === Text area ===
    /// Editing surface background
    pub bg: Color,
    /// Buffer text
    pub fg: Color,
    /// Line numbers
    pub gutter_fg: Color,
    /// Background of the cursor line
    pub cursor_line_bg: Color,

    // === Selection ===
    /// Selected item background (file tabs, settings pane)
    pub selected_bg: Color,
    /// Selected item text
    pub selected_fg: Color,

    // === Chrome ===
    /// Status bar background
    pub status_bg: Color,
    /// Status bar text
    pub status_fg: Color,
    /// Accent (active tab marker, read-only badge)
    pub accent: Color,
    /// Error messages
    pub error: Color,
}
