//! Rope-backed text buffer for sketchpad edit sessions.
//!
//! Provides text storage and line-oriented editing using ropey, a grapheme
//! based cursor, and word-wrap helpers for rendering.

mod buffer;
mod cursor;
mod wrap;

pub use buffer::TextBuffer;
pub use cursor::Cursor;
pub use wrap::wrap_line;
