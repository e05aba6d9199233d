//! In-buffer text search.
//!
//! Literal or regex matching over buffer text, plus the wrap-around lookup
//! used by find-next and find-previous.

use regex::Regex;

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// A match location in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Line number (0-indexed).
    pub line: usize,
    /// Column (character offset, 0-indexed).
    pub col: usize,
    /// Match length in characters.
    pub len: usize,
}

/// Search options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub regex: bool,
    pub whole_word: bool,
}

/// Search in text and return all matches in document order.
///
/// An empty pattern or an invalid regex yields no matches.
pub fn find_all(text: &str, pattern: &str, options: &SearchOptions) -> Vec<Match> {
    if pattern.is_empty() {
        return vec![];
    }

    let search_pattern = if options.regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };
    let search_pattern = if options.whole_word {
        format!(r"\b{}\b", search_pattern)
    } else {
        search_pattern
    };
    let regex = if options.case_sensitive {
        Regex::new(&search_pattern)
    } else {
        Regex::new(&format!("(?i){}", search_pattern))
    };
    let Ok(regex) = regex else {
        return vec![];
    };

    let mut matches = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        for mat in regex.find_iter(line) {
            // Zero-width regex hits are not navigable
            if mat.is_empty() {
                continue;
            }
            matches.push(Match {
                line: line_idx,
                col: line[..mat.start()].chars().count(),
                len: mat.as_str().chars().count(),
            });
        }
    }
    matches
}

/// Index of the match to jump to from a position, wrapping at either end.
///
/// Forward picks the first match at or after the position. Backward picks
/// the last match strictly before it.
pub fn find_closest(
    matches: &[Match],
    line: usize,
    col: usize,
    direction: SearchDirection,
) -> Option<usize> {
    if matches.is_empty() {
        return None;
    }

    match direction {
        SearchDirection::Forward => matches
            .iter()
            .position(|m| (m.line, m.col) >= (line, col))
            .or(Some(0)),
        SearchDirection::Backward => matches
            .iter()
            .rposition(|m| (m.line, m.col) < (line, col))
            .or(Some(matches.len() - 1)),
    }
}
