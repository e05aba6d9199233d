use sketchpad_config::SessionSettings;

/// Behavior switches of the session manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Load the cached code blob into the first opened file
    pub restore_latest_code: bool,
    /// Return the surface to read-only when the bound file is closed
    pub read_only_on_active_close: bool,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self::from(&SessionSettings::default())
    }
}

impl From<&SessionSettings> for ManagerOptions {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            restore_latest_code: settings.restore_latest_code,
            read_only_on_active_close: settings.read_only_on_active_close,
        }
    }
}
