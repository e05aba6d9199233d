//! Word wrapping for rendering long lines.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Split a line into visual rows no wider than `max_width` columns.
///
/// Breaks after the last non-alphanumeric grapheme that fits, and falls back
/// to a hard break inside words longer than the row. Always returns at least
/// one row, even for an empty line.
pub fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || line.width() <= max_width {
        return vec![line.to_string()];
    }

    let graphemes: Vec<&str> = line.graphemes(true).collect();
    let mut rows = Vec::new();
    let mut start = 0;

    while start < graphemes.len() {
        let end = wrap_point(&graphemes, start, max_width);
        rows.push(graphemes[start..end].concat());
        start = end;
    }

    rows
}

/// Grapheme index where the row starting at `start` ends.
fn wrap_point(graphemes: &[&str], start: usize, max_width: usize) -> usize {
    let mut width = 0;
    let mut end = start;

    while end < graphemes.len() {
        let w = graphemes[end].width();
        if width + w > max_width {
            break;
        }
        width += w;
        end += 1;
    }

    if end >= graphemes.len() {
        return graphemes.len();
    }

    let is_boundary = |g: &str| g.chars().next().is_none_or(|c| !c.is_alphanumeric());

    // Prefer breaking after the last boundary inside the row
    for i in (start + 1..end).rev() {
        if is_boundary(graphemes[i]) {
            return i + 1;
        }
    }

    // Single long word: hard break, but always make progress
    end.max(start + 1)
}
