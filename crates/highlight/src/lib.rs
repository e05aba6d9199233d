//! Syntax highlighting for sketchpad sessions using tree-sitter.
//!
//! One grammar per session mode: html, javascript, css and json. Any other
//! language name renders as plain text.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;
use std::sync::OnceLock;
use tree_sitter_highlight::{HighlightConfiguration, HighlightEvent, Highlighter};

/// Global static highlighter (lazily initialized)
static GLOBAL_HIGHLIGHTER: OnceLock<TreeSitterHighlighter> = OnceLock::new();

/// Get global highlighter
pub fn global_highlighter() -> &'static TreeSitterHighlighter {
    GLOBAL_HIGHLIGHTER.get_or_init(TreeSitterHighlighter::new)
}

/// Highlight categories recognized by the bundled queries.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "comment",
    "constant",
    "constant.builtin",
    "constructor",
    "function",
    "function.builtin",
    "function.method",
    "keyword",
    "number",
    "operator",
    "property",
    "punctuation",
    "punctuation.bracket",
    "punctuation.delimiter",
    "punctuation.special",
    "string",
    "string.special",
    "tag",
    "type",
    "variable",
    "variable.builtin",
    "variable.parameter",
    "escape",
    "embedded",
];

/// Languages with a bundled grammar, by mode name.
pub const SUPPORTED_LANGUAGES: &[&str] = &["html", "javascript", "css", "json"];

/// Grammar configurations keyed by mode name.
pub struct TreeSitterHighlighter {
    configs: HashMap<&'static str, HighlightConfiguration>,
}

impl TreeSitterHighlighter {
    pub fn new() -> Self {
        let highlight_names = HIGHLIGHT_NAMES
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();
        let mut configs = HashMap::new();

        Self::load_language_config(
            &mut configs,
            "javascript",
            tree_sitter_javascript::LANGUAGE.into(),
            tree_sitter_javascript::HIGHLIGHT_QUERY,
            tree_sitter_javascript::INJECTIONS_QUERY,
            &highlight_names,
        );
        Self::load_language_config(
            &mut configs,
            "html",
            tree_sitter_html::LANGUAGE.into(),
            tree_sitter_html::HIGHLIGHTS_QUERY,
            tree_sitter_html::INJECTIONS_QUERY,
            &highlight_names,
        );
        Self::load_language_config(
            &mut configs,
            "css",
            tree_sitter_css::LANGUAGE.into(),
            tree_sitter_css::HIGHLIGHTS_QUERY,
            "",
            &highlight_names,
        );
        Self::load_language_config(
            &mut configs,
            "json",
            tree_sitter_json::LANGUAGE.into(),
            tree_sitter_json::HIGHLIGHTS_QUERY,
            "",
            &highlight_names,
        );

        Self { configs }
    }

    fn load_language_config(
        configs: &mut HashMap<&'static str, HighlightConfiguration>,
        name: &'static str,
        language: tree_sitter::Language,
        highlights_query: &str,
        injections_query: &str,
        highlight_names: &[String],
    ) {
        match HighlightConfiguration::new(language, name, highlights_query, injections_query, "") {
            Ok(mut config) => {
                config.configure(highlight_names);
                configs.insert(name, config);
            }
            Err(e) => log::warn!("Highlight query for '{}' failed to load: {}", name, e),
        }
    }

    /// Configuration for a mode name.
    pub fn get_config(&self, language: &str) -> Option<&HighlightConfiguration> {
        self.configs.get(language)
    }

    /// Style of a highlight category.
    pub fn style_for_highlight(&self, highlight_id: usize, is_light_theme: bool) -> Style {
        let name = HIGHLIGHT_NAMES.get(highlight_id).copied().unwrap_or("");
        let (fg, modifier) = if is_light_theme {
            color_for_highlight_light(name)
        } else {
            color_for_highlight_dark(name)
        };
        Style::default().fg(fg).add_modifier(modifier)
    }
}

impl Default for TreeSitterHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Dark palette (One Dark inspired).
fn color_for_highlight_dark(name: &str) -> (Color, Modifier) {
    match name {
        "comment" => (Color::Rgb(105, 112, 125), Modifier::ITALIC),
        "keyword" => (Color::Rgb(199, 146, 234), Modifier::BOLD),
        "function" | "function.builtin" | "function.method" => {
            (Color::Rgb(130, 170, 255), Modifier::empty())
        }
        "string" | "string.special" => (Color::Rgb(152, 195, 121), Modifier::empty()),
        "number" => (Color::Rgb(209, 154, 102), Modifier::empty()),
        "constant" | "constant.builtin" => (Color::Rgb(229, 192, 123), Modifier::empty()),
        "type" => (Color::Rgb(86, 182, 194), Modifier::empty()),
        "variable.builtin" => (Color::Rgb(224, 108, 117), Modifier::ITALIC),
        "variable.parameter" => (Color::Rgb(224, 108, 117), Modifier::empty()),
        "property" => (Color::Rgb(152, 195, 121), Modifier::empty()),
        "operator" | "punctuation.special" | "embedded" => {
            (Color::Rgb(198, 120, 221), Modifier::empty())
        }
        "constructor" => (Color::Rgb(229, 192, 123), Modifier::BOLD),
        "tag" => (Color::Rgb(224, 108, 117), Modifier::empty()),
        "attribute" => (Color::Rgb(209, 154, 102), Modifier::empty()),
        "escape" => (Color::Rgb(86, 182, 194), Modifier::empty()),
        _ => (Color::Rgb(171, 178, 191), Modifier::empty()),
    }
}

/// Light palette (GitHub Light inspired).
fn color_for_highlight_light(name: &str) -> (Color, Modifier) {
    match name {
        "comment" => (Color::Rgb(106, 115, 125), Modifier::ITALIC),
        "keyword" => (Color::Rgb(215, 58, 73), Modifier::BOLD),
        "function" | "function.builtin" | "function.method" | "attribute" => {
            (Color::Rgb(111, 66, 193), Modifier::empty())
        }
        "string" | "string.special" => (Color::Rgb(3, 102, 214), Modifier::empty()),
        "number" | "constant" | "constant.builtin" | "property" | "escape" => {
            (Color::Rgb(0, 92, 197), Modifier::empty())
        }
        "variable.builtin" => (Color::Rgb(0, 92, 197), Modifier::ITALIC),
        "variable.parameter" => (Color::Rgb(0, 92, 197), Modifier::empty()),
        "type" | "operator" | "punctuation.special" | "embedded" => {
            (Color::Rgb(215, 58, 73), Modifier::empty())
        }
        "constructor" => (Color::Rgb(111, 66, 193), Modifier::BOLD),
        "tag" => (Color::Rgb(34, 134, 58), Modifier::empty()),
        _ => (Color::Rgb(36, 41, 46), Modifier::empty()),
    }
}

/// Cached lines before the cache starts over.
const MAX_CACHE_SIZE: usize = 1000;

/// Per-buffer cache of highlighted lines.
///
/// Entries remember the text they were computed from, so an edited line is
/// recomputed on its next lookup without explicit invalidation.
pub struct HighlightCache {
    lines: HashMap<usize, (String, Vec<(String, Style)>)>,
    language: Option<&'static str>,
    syntax_highlighter: &'static TreeSitterHighlighter,
    is_light_theme: bool,
}

impl HighlightCache {
    pub fn new(syntax_highlighter: &'static TreeSitterHighlighter, is_light_theme: bool) -> Self {
        Self {
            lines: HashMap::new(),
            language: None,
            syntax_highlighter,
            is_light_theme,
        }
    }

    /// Set syntax by mode name. Unsupported names turn highlighting off.
    pub fn set_syntax(&mut self, language_name: &str) {
        let language = SUPPORTED_LANGUAGES
            .iter()
            .copied()
            .find(|name| *name == language_name)
            .filter(|name| self.syntax_highlighter.get_config(name).is_some());
        if self.language != language {
            self.language = language;
            self.lines.clear();
        }
    }

    /// Change theme (light/dark).
    pub fn set_light_theme(&mut self, is_light: bool) {
        if self.is_light_theme != is_light {
            self.is_light_theme = is_light;
            self.lines.clear();
        }
    }

    pub fn has_syntax(&self) -> bool {
        self.language.is_some()
    }

    /// Highlighted segments of a line. Segment texts concatenate to `line_text`.
    pub fn get_line_segments(&mut self, line_idx: usize, line_text: &str) -> &[(String, Style)] {
        let fresh = self
            .lines
            .get(&line_idx)
            .is_some_and(|(text, _)| text == line_text);
        if !fresh {
            if self.lines.len() >= MAX_CACHE_SIZE {
                self.lines.clear();
            }
            let segments = self.compute_line_segments(line_text);
            self.lines
                .insert(line_idx, (line_text.to_string(), segments));
        }
        self.lines
            .get(&line_idx)
            .map(|(_, segments)| segments.as_slice())
            .unwrap_or_default()
    }

    fn compute_line_segments(&self, line_text: &str) -> Vec<(String, Style)> {
        let plain = || vec![(line_text.to_string(), Style::default())];
        let Some(config) = self
            .language
            .and_then(|language| self.syntax_highlighter.get_config(language))
        else {
            return plain();
        };

        let mut highlighter = Highlighter::new();
        let source = line_text.as_bytes();
        let Ok(highlights) = highlighter.highlight(config, source, None, |_| None) else {
            return plain();
        };

        let mut segments = Vec::new();
        let mut styles = vec![Style::default()];
        let mut current_text = String::new();

        for event in highlights {
            let Ok(event) = event else {
                return plain();
            };
            match event {
                HighlightEvent::Source { start, end } => {
                    if let Ok(text) = std::str::from_utf8(&source[start..end]) {
                        current_text.push_str(text);
                    }
                }
                HighlightEvent::HighlightStart(highlight) => {
                    flush_segment(&mut segments, &mut current_text, &styles);
                    styles.push(
                        self.syntax_highlighter
                            .style_for_highlight(highlight.0, self.is_light_theme),
                    );
                }
                HighlightEvent::HighlightEnd => {
                    flush_segment(&mut segments, &mut current_text, &styles);
                    if styles.len() > 1 {
                        styles.pop();
                    }
                }
            }
        }
        flush_segment(&mut segments, &mut current_text, &styles);

        if segments.is_empty() {
            plain()
        } else {
            segments
        }
    }
}

fn flush_segment(segments: &mut Vec<(String, Style)>, text: &mut String, styles: &[Style]) {
    if !text.is_empty() {
        let style = styles.last().copied().unwrap_or_default();
        segments.push((std::mem::take(text), style));
    }
}

impl std::fmt::Debug for HighlightCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightCache")
            .field("language", &self.language)
            .field("lines", &self.lines.len())
            .finish()
    }
}
