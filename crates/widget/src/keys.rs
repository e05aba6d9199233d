//! Keyboard input for the attached buffer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{Cursor, TextWidget};

impl TextWidget {
    /// Handle a key event.
    ///
    /// Registered commands take precedence, then the search prompt when it is
    /// open. Editing keys are ignored while the surface is read-only;
    /// navigation always works. Returns `true` if the event was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let command = self
            .commands
            .iter()
            .find(|c| c.chord.is_some_and(|chord| chord.matches(&key)))
            .map(|c| c.spec.action);
        if let Some(action) = command {
            self.run_action(action);
            return true;
        }

        if self.search.prompt_open {
            self.search_prompt_key(key);
            return true;
        }

        if self.active.is_none() {
            return false;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Up, KeyModifiers::NONE) => self.move_cursor(|c, _| c.move_up(1)),
            (KeyCode::Down, KeyModifiers::NONE) => {
                self.move_cursor(|c, max_line| c.move_down(1, max_line))
            }
            (KeyCode::Left, KeyModifiers::NONE) => self.move_left(),
            (KeyCode::Right, KeyModifiers::NONE) => self.move_right(),
            (KeyCode::Home, KeyModifiers::NONE) => self.move_cursor(|c, _| c.column = 0),
            (KeyCode::End, KeyModifiers::NONE) => self.move_cursor(|c, _| c.column = usize::MAX),
            (KeyCode::Char(ch), m) if m == KeyModifiers::NONE || m == KeyModifiers::SHIFT => {
                self.insert_text(&ch.to_string())
            }
            (KeyCode::Enter, KeyModifiers::NONE) => self.insert_text("\n"),
            (KeyCode::Tab, KeyModifiers::NONE) => self.insert_tab(),
            (KeyCode::Backspace, KeyModifiers::NONE) => self.backspace(),
            (KeyCode::Delete, KeyModifiers::NONE) => self.delete(),
            _ => return false,
        }
        true
    }

    /// Insert text at the cursor of the attached buffer.
    pub fn insert_text(&mut self, text: &str) {
        self.edit_active(|session| {
            session.cursor = session.buffer.insert(&session.cursor, text)?;
            Ok(())
        });
    }

    fn insert_tab(&mut self) {
        self.edit_active(|session| {
            let unit = if session.options.soft_tabs {
                // Pad to the next tab stop
                let tab = session.options.tab_size.max(1);
                " ".repeat(tab - session.cursor.column % tab)
            } else {
                "\t".to_string()
            };
            session.cursor = session.buffer.insert(&session.cursor, &unit)?;
            Ok(())
        });
    }

    fn backspace(&mut self) {
        self.edit_active(|session| {
            if let Some(cursor) = session.buffer.backspace(&session.cursor)? {
                session.cursor = cursor;
            }
            Ok(())
        });
    }

    fn delete(&mut self) {
        self.edit_active(|session| {
            session.buffer.delete_char(&session.cursor)?;
            Ok(())
        });
    }

    fn move_cursor<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Cursor, usize),
    {
        if let Some(session) = self.active_mut() {
            let max_line = session.buffer.line_count().saturating_sub(1);
            f(&mut session.cursor, max_line);
            session.cursor = session.buffer.clamp(session.cursor);
        }
    }

    fn move_left(&mut self) {
        if let Some(session) = self.active_mut() {
            let cursor = &mut session.cursor;
            if cursor.column > 0 {
                cursor.column -= 1;
            } else if cursor.line > 0 {
                cursor.line -= 1;
                cursor.column = session.buffer.line_len_graphemes(cursor.line);
            }
        }
    }

    fn move_right(&mut self) {
        if let Some(session) = self.active_mut() {
            let line_len = session.buffer.line_len_graphemes(session.cursor.line);
            let last_line = session.buffer.line_count().saturating_sub(1);
            if session.cursor.column < line_len {
                session.cursor.column += 1;
            } else if session.cursor.line < last_line {
                session.cursor = Cursor::at(session.cursor.line + 1, 0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchpad_core::{CommandAction, CommandSpec, EditorWidget, HostRequest, Mode};
    use sketchpad_keyboard::{Platform, PlatformBinding};
    use std::cell::Cell;
    use std::rc::Rc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(widget: &mut TextWidget, text: &str) {
        for ch in text.chars() {
            let code = if ch == '\n' {
                KeyCode::Enter
            } else {
                KeyCode::Char(ch)
            };
            widget.handle_key(key(code));
        }
    }

    #[test]
    fn test_typing_edits_and_notifies_per_key() {
        let mut widget = TextWidget::for_platform(Platform::Win);
        let id = widget.create_session("", Mode::JavaScript);
        widget.set_session(id);

        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        widget.set_change_listener(id, Box::new(move |_: &str| counter.set(counter.get() + 1)));

        typed(&mut widget, "ab\nc");
        assert_eq!(widget.session_text(id).as_deref(), Some("ab\nc"));
        assert_eq!(count.get(), 4);

        // Navigation does not count as an edit
        widget.handle_key(key(KeyCode::Left));
        widget.handle_key(key(KeyCode::Up));
        assert_eq!(count.get(), 4);
        assert_eq!(widget.cursor(), Some(Cursor::at(0, 0)));
    }

    #[test]
    fn test_read_only_ignores_typing() {
        let mut widget = TextWidget::for_platform(Platform::Win);
        let id = widget.create_session("x", Mode::Text);
        widget.set_session(id);
        widget.set_read_only(true);

        typed(&mut widget, "yz");
        widget.handle_key(key(KeyCode::Backspace));
        assert_eq!(widget.session_text(id).as_deref(), Some("x"));

        // Navigation still works
        assert!(widget.handle_key(key(KeyCode::End)));
        assert_eq!(widget.cursor(), Some(Cursor::at(0, 1)));
    }

    #[test]
    fn test_soft_tab_pads_to_tab_stop() {
        let mut widget = TextWidget::for_platform(Platform::Win);
        let id = widget.create_session("", Mode::JavaScript);
        widget.set_session(id);
        widget.set_tab_size(4);

        typed(&mut widget, "a");
        widget.handle_key(key(KeyCode::Tab));
        assert_eq!(widget.session_text(id).as_deref(), Some("a   "));

        widget.set_use_soft_tabs(false);
        widget.handle_key(key(KeyCode::Tab));
        assert_eq!(widget.session_text(id).as_deref(), Some("a   \t"));
    }

    #[test]
    fn test_chord_triggers_command() {
        let mut widget = TextWidget::for_platform(Platform::Win);
        let id = widget.create_session("x", Mode::Text);
        widget.set_session(id);
        widget.add_command(CommandSpec {
            name: "Preferences",
            binding: PlatformBinding::new("Ctrl-,", "Command-,"),
            action: CommandAction::Host(HostRequest::ToggleSettingsPane),
        });

        let consumed = widget.handle_key(KeyEvent::new(KeyCode::Char(','), KeyModifiers::CONTROL));
        assert!(consumed);
        assert_eq!(
            widget.take_host_requests(),
            vec![HostRequest::ToggleSettingsPane]
        );
        assert_eq!(widget.session_text(id).as_deref(), Some("x"));
    }

    #[test]
    fn test_unbound_surface_ignores_keys() {
        let mut widget = TextWidget::for_platform(Platform::Win);
        assert!(!widget.handle_key(key(KeyCode::Char('a'))));
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut widget = TextWidget::for_platform(Platform::Win);
        let id = widget.create_session("abc", Mode::Text);
        widget.set_session(id);
        widget.goto_line(1, 2);

        widget.handle_key(key(KeyCode::Backspace));
        assert_eq!(widget.session_text(id).as_deref(), Some("ac"));
        widget.handle_key(key(KeyCode::Delete));
        assert_eq!(widget.session_text(id).as_deref(), Some("a"));
    }
}
