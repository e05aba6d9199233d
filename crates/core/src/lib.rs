//! Core types and traits for the sketchpad editor panel.
//!
//! This crate provides the vocabulary shared by the session manager, the
//! text widget and the host application without coupling them together:
//! - `FileRecord` / `SharedFile` - project files handed to the editor
//! - `Mode` - syntax mode resolved from a file extension
//! - `EditorMessage` - typed messages the host sends to the editor
//! - `EditorWidget` - capabilities the editor needs from a text widget
//! - `SettingsProvider` / `PersistenceSink` - injected application services

pub mod file;
pub mod message;
pub mod mode;
pub mod services;
pub mod widget;

pub use file::{FileRecord, SharedFile};
pub use message::{EditorMessage, HostRequest};
pub use mode::Mode;
pub use services::{PersistenceSink, SettingsProvider};
pub use widget::{
    ChangeListener, CommandAction, CommandSpec, EditorWidget, SessionId, SessionOptions,
};

// Re-export settings and palette selector for convenience
pub use sketchpad_config::EditorSettings;
pub use sketchpad_theme::ThemeKind;
