//! Buffer state kept per edit session.

use sketchpad_buffer::{Cursor, TextBuffer};
use sketchpad_core::{ChangeListener, Mode, SessionOptions};
use sketchpad_highlight::{global_highlighter, HighlightCache};

/// One widget buffer with its cursor and listener.
pub(crate) struct Session {
    pub buffer: TextBuffer,
    pub mode: Mode,
    pub highlight: HighlightCache,
    pub options: SessionOptions,
    pub cursor: Cursor,
    /// First visible line
    pub scroll: usize,
    pub listener: Option<ChangeListener>,
}

impl Session {
    pub fn new(text: &str, mode: Mode) -> Self {
        let mut highlight = HighlightCache::new(global_highlighter(), false);
        highlight.set_syntax(mode.name());
        Self {
            buffer: TextBuffer::from_text(text),
            mode,
            highlight,
            options: SessionOptions::default(),
            cursor: Cursor::new(),
            scroll: 0,
            listener: None,
        }
    }

    /// Text inserted by one indentation step.
    pub fn indent_unit(&self) -> String {
        if self.options.soft_tabs {
            " ".repeat(self.options.tab_size.max(1))
        } else {
            "\t".to_string()
        }
    }

    /// Notify the listener if the buffer changed since `version`.
    pub fn notify_if_changed(&mut self, version: u64) {
        if self.buffer.version() == version {
            return;
        }
        let text = self.buffer.text();
        if let Some(listener) = self.listener.as_mut() {
            listener(&text);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("highlight", &self.highlight)
            .field("options", &self.options)
            .field("cursor", &self.cursor)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
