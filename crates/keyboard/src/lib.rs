//! Key binding notation and matching.
//!
//! Editor commands are bound with a textual notation such as `"Ctrl-["` or
//! `"Command-,"`, one string per platform. This crate parses that notation
//! into a chord and matches it against terminal key events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Platform flavor of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Windows and Linux (`Ctrl`-based bindings)
    Win,
    /// macOS (`Command`-based bindings)
    Mac,
}

impl Platform {
    /// Platform the binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Win
        }
    }
}

/// Binding strings for both platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformBinding {
    pub win: &'static str,
    pub mac: &'static str,
}

impl PlatformBinding {
    pub const fn new(win: &'static str, mac: &'static str) -> Self {
        Self { win, mac }
    }

    /// Binding string for a platform.
    pub fn for_platform(&self, platform: Platform) -> &'static str {
        match platform {
            Platform::Win => self.win,
            Platform::Mac => self.mac,
        }
    }

    /// Parsed chord for a platform.
    pub fn chord(&self, platform: Platform) -> Option<KeyChord> {
        KeyChord::parse(self.for_platform(platform))
    }
}

/// A single key with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    /// Parse binding notation.
    ///
    /// Modifiers are separated by `-` and precede the key. The key itself may
    /// be `-` (as in `"Ctrl--"`). Returns `None` for unknown modifiers or keys.
    pub fn parse(notation: &str) -> Option<Self> {
        let notation = notation.trim();
        if notation.is_empty() {
            return None;
        }

        // Split off the key; a trailing "--" means the key is '-'
        let (mods, key) = match notation.strip_suffix("--") {
            Some(rest) => (rest, "-"),
            None => match notation.rfind('-') {
                Some(idx) => (&notation[..idx], &notation[idx + 1..]),
                None => ("", notation),
            },
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in mods.split('-').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" | "option" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                "command" | "cmd" | "super" => KeyModifiers::SUPER,
                _ => return None,
            };
        }

        let code = parse_key(key)?;
        Some(Self { code, modifiers })
    }

    /// Check whether a key event triggers this chord.
    ///
    /// Letters compare case-insensitively since terminals report
    /// `Ctrl+Shift+a` inconsistently.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.modifiers != self.modifiers {
            return false;
        }
        match (self.code, key.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }
}

fn parse_key(key: &str) -> Option<KeyCode> {
    let mut chars = key.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(ch.to_ascii_lowercase()));
    }

    match key.to_lowercase().as_str() {
        "tab" => Some(KeyCode::Tab),
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "space" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        "delete" => Some(KeyCode::Delete),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ctrl_bracket() {
        let chord = KeyChord::parse("Ctrl-[").unwrap();
        assert_eq!(chord.code, KeyCode::Char('['));
        assert_eq!(chord.modifiers, KeyModifiers::CONTROL);
    }

    #[test]
    fn test_parse_command_comma() {
        let chord = KeyChord::parse("Command-,").unwrap();
        assert_eq!(chord.code, KeyCode::Char(','));
        assert_eq!(chord.modifiers, KeyModifiers::SUPER);
    }

    #[test]
    fn test_parse_dash_key() {
        let chord = KeyChord::parse("Ctrl--").unwrap();
        assert_eq!(chord.code, KeyCode::Char('-'));
        assert_eq!(chord.modifiers, KeyModifiers::CONTROL);
    }

    #[test]
    fn test_parse_multiple_modifiers_and_named_key() {
        let chord = KeyChord::parse("Ctrl-Shift-Tab").unwrap();
        assert_eq!(chord.code, KeyCode::Tab);
        assert_eq!(chord.modifiers, KeyModifiers::CONTROL | KeyModifiers::SHIFT);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(KeyChord::parse("Hyper-x").is_none());
        assert!(KeyChord::parse("Ctrl-Banana").is_none());
        assert!(KeyChord::parse("").is_none());
    }

    #[test]
    fn test_matches_requires_exact_modifiers() {
        let chord = KeyChord::parse("Ctrl-]").unwrap();
        assert!(chord.matches(&KeyEvent::new(KeyCode::Char(']'), KeyModifiers::CONTROL)));
        assert!(!chord.matches(&KeyEvent::new(KeyCode::Char(']'), KeyModifiers::NONE)));
        assert!(!chord.matches(&KeyEvent::new(
            KeyCode::Char(']'),
            KeyModifiers::CONTROL | KeyModifiers::ALT
        )));
    }

    #[test]
    fn test_matches_letters_case_insensitive() {
        let chord = KeyChord::parse("Ctrl-N").unwrap();
        assert!(chord.matches(&KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL)));
        assert!(chord.matches(&KeyEvent::new(KeyCode::Char('N'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_platform_binding() {
        let binding = PlatformBinding::new("Ctrl-,", "Command-,");
        assert_eq!(binding.for_platform(Platform::Win), "Ctrl-,");
        assert_eq!(
            binding.chord(Platform::Mac).unwrap().modifiers,
            KeyModifiers::SUPER
        );
    }
}
