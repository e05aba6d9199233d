use std::fmt;

/// Errors reported by the session manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorError {
    /// An open request carried no file
    MissingFile,
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::MissingFile => write!(f, "Cannot open editor session: no file given"),
        }
    }
}

impl std::error::Error for EditorError {}
