//! Project file records.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// One logical file of the project.
///
/// Records are owned by the project layer; the editor only receives shared
/// handles and writes `contents` back when the bound buffer changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique name within the project
    pub name: String,
    /// Extension including the leading dot (".js"), empty if none
    pub extension: String,
    /// Current text content
    pub contents: String,
}

/// Shared, mutable handle to a project file.
pub type SharedFile = Rc<RefCell<FileRecord>>;

impl FileRecord {
    /// Create a record with an explicit extension.
    pub fn new(
        name: impl Into<String>,
        extension: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            contents: contents.into(),
        }
    }

    /// Create a record, deriving the extension from the name.
    pub fn from_name(name: impl Into<String>, contents: impl Into<String>) -> Self {
        let name = name.into();
        let extension = extension_of(&name).to_string();
        Self {
            name,
            extension,
            contents: contents.into(),
        }
    }

    /// Wrap into a shared handle.
    pub fn into_shared(self) -> SharedFile {
        Rc::new(RefCell::new(self))
    }
}

/// Extension of a file name including the leading dot.
///
/// Dotfiles without a further dot (".gitignore") have no extension.
pub fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &name[idx..],
    }
}
