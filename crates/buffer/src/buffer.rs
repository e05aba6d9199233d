use anyhow::Result;
use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;

use crate::Cursor;

/// Text buffer based on Rope
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    /// Rope structure for storing text
    rope: Rope,
    /// Incremented on every mutation
    version: u64,
}

impl TextBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create buffer with initial text
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            version: 0,
        }
    }

    /// Get all text
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the whole content
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.version += 1;
    }

    /// Mutation counter
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if buffer holds no text
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get line count
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get line by index, without the trailing newline
    pub fn line(&self, index: usize) -> Option<String> {
        if index < self.line_count() {
            let line = self.rope.line(index).to_string();
            Some(line.trim_end_matches(['\n', '\r']).to_string())
        } else {
            None
        }
    }

    /// Get line length in graphemes (without newline character)
    pub fn line_len_graphemes(&self, line_idx: usize) -> usize {
        self.line(line_idx)
            .map(|line| line.graphemes(true).count())
            .unwrap_or(0)
    }

    /// Clamp cursor to an existing position
    pub fn clamp(&self, cursor: Cursor) -> Cursor {
        let line = cursor.line.min(self.line_count().saturating_sub(1));
        let column = cursor.column.min(self.line_len_graphemes(line));
        Cursor::at(line, column)
    }

    /// Insert text at cursor position
    pub fn insert(&mut self, cursor: &Cursor, text: &str) -> Result<Cursor> {
        let char_idx = self.cursor_to_char_idx(cursor)?;
        self.rope.insert(char_idx, text);
        self.version += 1;
        Ok(self.advance_cursor(cursor, text))
    }

    /// Delete character at cursor position (delete)
    pub fn delete_char(&mut self, cursor: &Cursor) -> Result<bool> {
        let char_idx = self.cursor_to_char_idx(cursor)?;

        // Check if there is something to delete
        if char_idx >= self.rope.len_chars() {
            return Ok(false);
        }

        self.rope.remove(char_idx..char_idx + 1);
        self.version += 1;
        Ok(true)
    }

    /// Delete character before cursor (backspace)
    pub fn backspace(&mut self, cursor: &Cursor) -> Result<Option<Cursor>> {
        let char_idx = self.cursor_to_char_idx(cursor)?;
        if char_idx == 0 {
            return Ok(None);
        }

        // Calculate new cursor position
        let new_cursor = if cursor.column > 0 {
            Cursor::at(cursor.line, cursor.column - 1)
        } else {
            // Move to previous line
            let prev_line_len = self.line_len_graphemes(cursor.line - 1);
            Cursor::at(cursor.line - 1, prev_line_len)
        };

        let start = self.cursor_to_char_idx(&new_cursor)?;
        self.rope.remove(start..char_idx);
        self.version += 1;
        Ok(Some(new_cursor))
    }

    /// Prepend an indent unit to a line
    pub fn indent_line(&mut self, line: usize, unit: &str) -> Result<()> {
        if line >= self.line_count() {
            anyhow::bail!("Line {} out of range", line);
        }
        let line_start = self.rope.line_to_char(line);
        self.rope.insert(line_start, unit);
        self.version += 1;
        Ok(())
    }

    /// Remove one level of indentation from a line
    ///
    /// Removes a leading hard tab, or up to `tab_size` leading spaces.
    /// Returns the number of characters removed (0 when the line is not
    /// indented; the buffer is then left untouched).
    pub fn outdent_line(&mut self, line: usize, tab_size: usize) -> Result<usize> {
        let Some(text) = self.line(line) else {
            anyhow::bail!("Line {} out of range", line);
        };

        let removed = if text.starts_with('\t') {
            1
        } else {
            text.chars()
                .take(tab_size.max(1))
                .take_while(|c| *c == ' ')
                .count()
        };

        if removed > 0 {
            let line_start = self.rope.line_to_char(line);
            self.rope.remove(line_start..line_start + removed);
            self.version += 1;
        }
        Ok(removed)
    }

    /// Convert cursor position to character index in Rope
    fn cursor_to_char_idx(&self, cursor: &Cursor) -> Result<usize> {
        if cursor.line >= self.line_count() {
            anyhow::bail!("Line {} out of range", cursor.line);
        }

        let line_start = self.rope.line_to_char(cursor.line);
        let line_str = self.line(cursor.line).unwrap_or_default();

        // Byte offset of the requested grapheme column
        let byte_pos: usize = line_str
            .graphemes(true)
            .take(cursor.column)
            .map(|g| g.len())
            .sum();

        let char_offset = line_str[..byte_pos].chars().count();
        Ok(line_start + char_offset)
    }

    /// Advance cursor after text insertion
    fn advance_cursor(&self, cursor: &Cursor, text: &str) -> Cursor {
        let newlines = text.matches('\n').count();
        if newlines == 0 {
            return Cursor::at(cursor.line, cursor.column + text.graphemes(true).count());
        }

        let tail = text.rsplit('\n').next().unwrap_or("");
        Cursor::at(cursor.line + newlines, tail.graphemes(true).count())
    }
}
