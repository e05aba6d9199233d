//! Search prompt of the surface.
//!
//! `find` opens a one-line prompt at the bottom of the surface. Typing
//! searches incrementally from where the cursor was when the prompt opened;
//! Enter and `findnext` step forward, Shift-Enter and `findprevious` step
//! backward, both wrapping around the buffer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

use sketchpad_core::{CommandAction, CommandSpec, SessionId};
use sketchpad_keyboard::PlatformBinding;
use sketchpad_text_search::{find_all, find_closest, Match, SearchDirection, SearchOptions};

use crate::{Cursor, TextWidget};

/// Search commands every widget starts with.
pub(crate) const SEARCH_COMMANDS: [CommandSpec; 3] = [
    CommandSpec {
        name: "find",
        binding: PlatformBinding::new("Ctrl-F", "Command-F"),
        action: CommandAction::Find,
    },
    CommandSpec {
        name: "findnext",
        binding: PlatformBinding::new("Ctrl-K", "Command-G"),
        action: CommandAction::FindNext,
    },
    CommandSpec {
        name: "findprevious",
        binding: PlatformBinding::new("Ctrl-Shift-K", "Command-Shift-G"),
        action: CommandAction::FindPrevious,
    },
];

#[derive(Debug, Default)]
pub(crate) struct SearchState {
    pub query: String,
    pub prompt_open: bool,
    pub options: SearchOptions,
    /// Cursor when the prompt opened
    origin: Cursor,
    pub matches: Vec<Match>,
    /// Index into `matches` of the match under the cursor
    pub current: Option<usize>,
    /// Buffer and version `matches` were computed for
    searched: Option<(SessionId, u64)>,
}

/// Char offset of a grapheme column.
fn char_col(line: &str, column: usize) -> usize {
    line.graphemes(true).take(column).map(|g| g.chars().count()).sum()
}

/// Grapheme column of a char offset.
fn grapheme_col(line: &str, col: usize) -> usize {
    let mut chars = 0;
    line.graphemes(true)
        .take_while(|g| {
            let inside = chars < col;
            chars += g.chars().count();
            inside
        })
        .count()
}

impl TextWidget {
    /// Current search query.
    pub fn search_query(&self) -> &str {
        &self.search.query
    }

    pub fn is_search_open(&self) -> bool {
        self.search.prompt_open
    }

    /// Number of matches of the query in the attached buffer.
    pub fn search_match_count(&mut self) -> usize {
        self.refresh_matches();
        self.search.matches.len()
    }

    pub(crate) fn open_search(&mut self) {
        self.search.prompt_open = true;
        self.search.origin = self.cursor().unwrap_or_default();
    }

    pub(crate) fn close_search(&mut self) {
        self.search.prompt_open = false;
        self.search.current = None;
    }

    /// Recompute matches if the query, buffer or its text changed.
    pub(crate) fn refresh_matches(&mut self) {
        let Some(id) = self.active else {
            self.search.matches.clear();
            self.search.searched = None;
            return;
        };
        let Some(session) = self.sessions.get(&id) else {
            return;
        };
        let key = (id, session.buffer.version());
        if self.search.searched == Some(key) {
            return;
        }
        self.search.matches = find_all(
            &session.buffer.text(),
            &self.search.query,
            &self.search.options,
        );
        self.search.current = None;
        self.search.searched = Some(key);
    }

    /// Move to the next or previous match from the cursor.
    pub(crate) fn find_step(&mut self, direction: SearchDirection) {
        let Some(cursor) = self.cursor() else {
            return;
        };
        let from = match direction {
            // Step past a match starting under the cursor
            SearchDirection::Forward => Cursor::at(cursor.line, cursor.column + 1),
            SearchDirection::Backward => cursor,
        };
        self.jump_to_match(from, direction);
    }

    fn search_from_origin(&mut self) {
        self.jump_to_match(self.search.origin, SearchDirection::Forward);
    }

    fn jump_to_match(&mut self, from: Cursor, direction: SearchDirection) {
        self.refresh_matches();
        let Some(id) = self.active else {
            return;
        };
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };

        let line = session.buffer.line(from.line).unwrap_or_default();
        let col = char_col(&line, from.column);
        let Some(idx) = find_closest(&self.search.matches, from.line, col, direction) else {
            self.search.current = None;
            return;
        };

        let target = self.search.matches[idx];
        let line = session.buffer.line(target.line).unwrap_or_default();
        session.cursor = Cursor::at(target.line, grapheme_col(&line, target.col));
        self.search.current = Some(idx);
    }

    /// Handle a key while the prompt is open. Every key is consumed.
    pub(crate) fn search_prompt_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => self.close_search(),
            (KeyCode::Enter, KeyModifiers::SHIFT) => self.find_step(SearchDirection::Backward),
            (KeyCode::Enter, _) => self.find_step(SearchDirection::Forward),
            (KeyCode::Backspace, _) => {
                self.search.query.pop();
                self.search.searched = None;
                self.search_from_origin();
            }
            (KeyCode::Char(ch), m) if m == KeyModifiers::NONE || m == KeyModifiers::SHIFT => {
                self.search.query.push(ch);
                self.search.searched = None;
                self.search_from_origin();
            }
            _ => {}
        }
    }
}
