//! Messages exchanged between the host application and the editor.

use crate::{EditorSettings, SharedFile};

/// Messages the host sends to the editor.
///
/// Processed in order by `EditorManager::dispatch`, each one to completion.
#[derive(Debug, Clone)]
pub enum EditorMessage {
    /// Bind a file to the surface (None is rejected with a logged error)
    OpenFile(Option<SharedFile>),
    /// Drop the session registered for a file name
    CloseFile(String),
    /// Bind a fresh empty JavaScript buffer
    ClearEditor,
    /// Re-apply editor settings
    SettingsChanged(EditorSettings),
}

/// Requests the editor raises for the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    /// Show or hide the settings pane
    ToggleSettingsPane,
}
