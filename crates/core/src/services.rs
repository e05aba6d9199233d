//! Application services injected into the editor.

use std::cell::RefCell;

use crate::{EditorSettings, FileRecord};

/// Source of the current editor settings.
pub trait SettingsProvider {
    fn settings(&self) -> EditorSettings;
}

impl SettingsProvider for EditorSettings {
    fn settings(&self) -> EditorSettings {
        self.clone()
    }
}

impl SettingsProvider for RefCell<EditorSettings> {
    fn settings(&self) -> EditorSettings {
        self.borrow().clone()
    }
}

/// Project persistence collaborator.
///
/// Writes are fire-and-forget: implementations log failures and never
/// report them back to the editor.
pub trait PersistenceSink {
    /// Persist the whole project after `edited` changed.
    fn save_project(&self, edited: &FileRecord);

    /// Decoded text of the most recently edited buffer, if cached.
    ///
    /// Absent or malformed blobs are reported as `None`.
    fn latest_code(&self) -> Option<String>;
}
