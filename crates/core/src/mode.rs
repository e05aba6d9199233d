//! Syntax modes and the extension table.

use std::fmt;

/// Syntax-highlighting profile of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Html,
    JavaScript,
    Css,
    Json,
    Text,
}

/// Extension → mode table.
///
/// Interoperability depends on this exact mapping.
pub const EXTENSION_MODES: &[(&str, Mode)] = &[
    (".html", Mode::Html),
    (".htm", Mode::Html),
    (".js", Mode::JavaScript),
    (".css", Mode::Css),
    (".json", Mode::Json),
    (".txt", Mode::Text),
];

impl Mode {
    /// Mode identifier as used by the widget ("javascript", "text", ...).
    pub fn name(self) -> &'static str {
        match self {
            Mode::Html => "html",
            Mode::JavaScript => "javascript",
            Mode::Css => "css",
            Mode::Json => "json",
            Mode::Text => "text",
        }
    }

    /// Look up an extension (with leading dot) in the table.
    pub fn from_extension(extension: &str) -> Option<Mode> {
        let extension = extension.to_ascii_lowercase();
        EXTENSION_MODES
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, mode)| *mode)
    }

    /// Resolve an extension, falling back to plain text.
    pub fn resolve(extension: &str) -> Mode {
        Self::from_extension(extension).unwrap_or_else(|| {
            log::debug!("No mode for extension '{}', using text", extension);
            Mode::Text
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
