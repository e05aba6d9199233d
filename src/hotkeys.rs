//! Host-level hotkeys.
//!
//! Checked before a key reaches the editor widget. Editor commands
//! (indent, outdent, find, preferences) are bound inside the widget instead.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sketchpad_keyboard::KeyChord;

/// Actions the host performs in response to a hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    NextFile,
    PrevFile,
    CloseFile,
    ClearEditor,
    ToggleTheme,
    Quit,
}

const HOTKEYS: &[(&str, HostAction)] = &[
    ("Ctrl-N", HostAction::NextFile),
    ("Ctrl-P", HostAction::PrevFile),
    ("Ctrl-W", HostAction::CloseFile),
    ("Ctrl-L", HostAction::ClearEditor),
    ("Ctrl-T", HostAction::ToggleTheme),
    ("Ctrl-Q", HostAction::Quit),
];

impl HostAction {
    /// Map a key event to a host action.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        HOTKEYS.iter().find_map(|(notation, action)| {
            KeyChord::parse(notation)
                .filter(|chord| chord.matches(key))
                .map(|_| *action)
        })
    }
}

/// Keys handled by the settings pane while it is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneAction {
    Close,
    TabSizeUp,
    TabSizeDown,
    ToggleSoftTabs,
    ToggleWordWrap,
    ToggleTheme,
}

impl PaneAction {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.modifiers != KeyModifiers::NONE && key.modifiers != KeyModifiers::SHIFT {
            return None;
        }
        match key.code {
            KeyCode::Esc => Some(PaneAction::Close),
            KeyCode::Char('+') => Some(PaneAction::TabSizeUp),
            KeyCode::Char('-') => Some(PaneAction::TabSizeDown),
            KeyCode::Char('s') => Some(PaneAction::ToggleSoftTabs),
            KeyCode::Char('w') => Some(PaneAction::ToggleWordWrap),
            KeyCode::Char('t') => Some(PaneAction::ToggleTheme),
            _ => None,
        }
    }
}
