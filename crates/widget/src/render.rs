//! Rendering of the attached buffer.

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use sketchpad_buffer::wrap_line;
use sketchpad_core::ThemeKind;

use crate::TextWidget;

const SEARCH_LABEL: &str = "Find: ";

/// Expand hard tabs to spaces for display.
fn expand_tabs(line: &str, tab_size: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = tab_size - column % tab_size;
            out.push_str(&" ".repeat(pad));
            column += pad;
        } else {
            out.push(ch);
            column += ch.to_string().width();
        }
    }
    out
}

/// Prefix of `line` covering the first `graphemes` graphemes.
fn grapheme_prefix(line: &str, graphemes: usize) -> &str {
    let end: usize = line.graphemes(true).take(graphemes).map(|g| g.len()).sum();
    &line[..end]
}

/// Style of every display column of a line after tab expansion.
///
/// `marks` are char ranges `(start, len, style)` patched over the segment
/// styles.
fn column_styles(
    segments: &[(String, Style)],
    tab_size: usize,
    marks: &[(usize, usize, Style)],
) -> Vec<Style> {
    let mut styles = Vec::new();
    let mut char_idx = 0;
    for (text, segment_style) in segments {
        for ch in text.chars() {
            let width = if ch == '\t' {
                tab_size - styles.len() % tab_size
            } else {
                ch.to_string().width()
            };
            let style = marks
                .iter()
                .filter(|(start, len, _)| (*start..start + len).contains(&char_idx))
                .fold(*segment_style, |style, (_, _, mark)| style.patch(*mark));
            styles.extend(std::iter::repeat(style).take(width));
            char_idx += 1;
        }
    }
    styles
}

impl TextWidget {
    /// Render the attached buffer into `area`.
    ///
    /// Scrolls so the cursor stays visible and returns the screen position of
    /// the cursor when the surface has focus. While the search prompt is open
    /// it takes the bottom row and holds the cursor.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) -> Option<Position> {
        let theme = self.theme.theme();
        let base = Style::default().bg(theme.bg).fg(theme.fg);
        buf.set_style(area, base);

        if area.width == 0 || area.height == 0 {
            return None;
        }

        let focused = self.focused;
        let is_light = self.theme == ThemeKind::Light;
        let prompt_open = self.search.prompt_open && area.height > 1;
        if prompt_open {
            self.refresh_matches();
        }
        let (matches, current) = if prompt_open {
            (self.search.matches.clone(), self.search.current)
        } else {
            (Vec::new(), None)
        };
        let current_style = Style::default().bg(theme.selected_bg).fg(theme.selected_fg);
        let other_style = Style::default().add_modifier(Modifier::UNDERLINED);

        let Some(session) = self.active.and_then(|id| self.sessions.get_mut(&id)) else {
            buf.set_string(area.x + 1, area.y, "No file open", base.fg(theme.gutter_fg));
            return None;
        };
        session.highlight.set_light_theme(is_light);

        let tab_size = session.options.tab_size.max(1);
        let word_wrap = session.options.word_wrap;
        let line_count = session.buffer.line_count();
        let gutter = line_count.to_string().len().max(3) as u16 + 1;
        let text_width = area.width.saturating_sub(gutter) as usize;
        let height = area.height as usize - usize::from(prompt_open);

        let rows_of = |line: &str| -> Vec<String> {
            let expanded = expand_tabs(line, tab_size);
            if word_wrap {
                wrap_line(&expanded, text_width)
            } else {
                vec![expanded]
            }
        };

        // Keep the cursor line inside the viewport
        let cursor = session.cursor;
        if cursor.line < session.scroll {
            session.scroll = cursor.line;
        }
        loop {
            let used: usize = (session.scroll..=cursor.line)
                .map(|idx| rows_of(&session.buffer.line(idx).unwrap_or_default()).len())
                .sum();
            if used <= height || session.scroll >= cursor.line {
                break;
            }
            session.scroll += 1;
        }

        let mut cursor_pos = None;
        let mut y = area.y;
        let bottom = area.y + height as u16;
        let mut line_idx = session.scroll;

        while y < bottom && line_idx < line_count {
            let line = session.buffer.line(line_idx).unwrap_or_default();
            let rows = rows_of(&line);
            let is_cursor_line = line_idx == cursor.line;

            let marks: Vec<(usize, usize, Style)> = matches
                .iter()
                .enumerate()
                .filter(|(_, m)| m.line == line_idx)
                .map(|(idx, m)| {
                    let style = if current == Some(idx) { current_style } else { other_style };
                    (m.col, m.len, style)
                })
                .collect();
            let styles = column_styles(
                session.highlight.get_line_segments(line_idx, &line),
                tab_size,
                &marks,
            );

            // Cursor display column within the expanded line
            let cursor_col = is_cursor_line.then(|| {
                expand_tabs(grapheme_prefix(&line, cursor.column), tab_size).width()
            });

            let mut row_start_col = 0;
            for (row_idx, row) in rows.iter().enumerate() {
                if y >= bottom {
                    break;
                }
                let row_area = Rect::new(area.x, y, area.width, 1);
                if is_cursor_line {
                    buf.set_style(row_area, base.bg(theme.cursor_line_bg));
                }
                if row_idx == 0 {
                    let number = format!("{:>width$} ", line_idx + 1, width = gutter as usize - 1);
                    buf.set_string(area.x, y, number, base.fg(theme.gutter_fg));
                }
                buf.set_stringn(area.x + gutter, y, row, text_width, Style::default());

                let row_width = row.width();
                for dx in 0..row_width.min(text_width) {
                    match styles.get(row_start_col + dx) {
                        Some(style) if *style != Style::default() => {
                            buf[(area.x + gutter + dx as u16, y)].set_style(*style);
                        }
                        _ => {}
                    }
                }

                if let Some(col) = cursor_col {
                    let last_row = row_idx + 1 == rows.len();
                    let in_row = col >= row_start_col
                        && (col < row_start_col + row_width || last_row);
                    if in_row && cursor_pos.is_none() {
                        let x = (col - row_start_col).min(text_width.saturating_sub(1));
                        cursor_pos = Some(Position::new(area.x + gutter + x as u16, y));
                    }
                }
                row_start_col += row_width;
                y += 1;
            }
            line_idx += 1;
        }

        if prompt_open {
            cursor_pos = Some(self.render_search_prompt(area, buf, matches.len(), current));
        }

        if focused {
            cursor_pos
        } else {
            None
        }
    }

    /// Draw the prompt on the bottom row of `area` and return its cursor.
    fn render_search_prompt(
        &self,
        area: Rect,
        buf: &mut Buffer,
        match_count: usize,
        current: Option<usize>,
    ) -> Position {
        let theme = self.theme.theme();
        let style = Style::default().bg(theme.status_bg).fg(theme.status_fg);
        let y = area.bottom() - 1;
        buf.set_style(Rect::new(area.x, y, area.width, 1), style);

        let query = &self.search.query;
        let status = match current {
            Some(idx) => format!(" {} of {} ", idx + 1, match_count),
            None if query.is_empty() => String::new(),
            None if match_count == 0 => " no matches ".to_string(),
            None => format!(" {} matches ", match_count),
        };

        let label_width = SEARCH_LABEL.width() as u16;
        buf.set_stringn(area.x, y, SEARCH_LABEL, area.width as usize, style.fg(theme.accent));
        let query_x = area.x + label_width.min(area.width);
        let room = area.right().saturating_sub(query_x) as usize;
        buf.set_stringn(query_x, y, query, room, style);

        let status_width = status.width() as u16;
        if status_width + label_width + (query.width() as u16) < area.width {
            buf.set_string(area.right() - status_width, y, &status, style);
        }

        let x = (query_x as usize + query.width()).min(area.right() as usize - 1);
        Position::new(x as u16, y)
    }
}
