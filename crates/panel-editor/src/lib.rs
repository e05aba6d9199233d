//! Editor session manager for sketchpad.
//!
//! `EditorManager` maps project files to widget buffers, keeps one of them
//! bound to the visible surface, and writes every edit back into the file
//! record and the persistence sink.

pub mod constants;
mod error;
mod manager;
mod options;

pub use error::EditorError;
pub use manager::{EditSession, EditorManager, LoadedFileSender};
pub use options::ManagerOptions;
