//! Configuration structures for sketchpad settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults;

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Editor settings (consumed by the editor panel on every open)
    #[serde(default)]
    pub editor: EditorSettings,

    /// Session manager behavior
    #[serde(default)]
    pub session: SessionSettings,

    /// Local storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Tab width in columns
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,

    /// Insert spaces instead of a hard tab
    #[serde(default = "default_soft_tabs")]
    pub soft_tabs: bool,

    /// Wrap long lines at the surface width
    #[serde(default = "default_word_wrap")]
    pub word_wrap: bool,

    /// Theme selector ("light-theme" or "dark-theme")
    #[serde(default = "default_editor_theme")]
    pub editor_theme: String,
}

/// Session manager settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Load the cached code blob into the first opened file
    #[serde(default = "default_restore_latest_code")]
    pub restore_latest_code: bool,

    /// Make the surface read-only when the bound file is closed
    #[serde(default)]
    pub read_only_on_active_close: bool,
}

/// Local storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Storage directory (defaults to the XDG cache directory)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Delay before a requested project save hits the disk (0 = immediate)
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional)
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,
}

impl EditorSettings {
    /// Return a copy with out-of-range values clamped.
    ///
    /// A tab size of zero is not representable in the widget and becomes 1.
    pub fn normalized(&self) -> Self {
        Self {
            tab_size: self.tab_size.max(1),
            ..self.clone()
        }
    }

    /// Return a copy with the light/dark theme selector flipped.
    ///
    /// Unknown selectors switch to the dark theme.
    pub fn with_toggled_theme(&self) -> Self {
        let editor_theme = if self.editor_theme == defaults::DARK_THEME {
            defaults::LIGHT_THEME
        } else {
            defaults::DARK_THEME
        };
        Self {
            editor_theme: editor_theme.to_string(),
            ..self.clone()
        }
    }
}

// Default value functions for serde
fn default_tab_size() -> usize {
    defaults::TAB_SIZE
}

fn default_soft_tabs() -> bool {
    defaults::SOFT_TABS
}

fn default_word_wrap() -> bool {
    defaults::WORD_WRAP
}

fn default_editor_theme() -> String {
    defaults::LIGHT_THEME.to_string()
}

fn default_restore_latest_code() -> bool {
    defaults::RESTORE_LATEST_CODE
}

fn default_save_debounce_ms() -> u64 {
    defaults::SAVE_DEBOUNCE_MS
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

// Default implementations
impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_size: default_tab_size(),
            soft_tabs: default_soft_tabs(),
            word_wrap: default_word_wrap(),
            editor_theme: default_editor_theme(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            restore_latest_code: default_restore_latest_code(),
            read_only_on_active_close: false,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            cache_dir: None,
            save_debounce_ms: default_save_debounce_ms(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
        }
    }
}
