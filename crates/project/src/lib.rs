//! Project files and local storage for sketchpad.
//!
//! This crate plays the project layer around the editor:
//! - `Project` owns the file records the editor binds to
//! - `LocalStorage` is a small key/value store on disk
//! - `ProjectCache` persists the project and the latest edited code
//! - `spawn_dir_loader` reads a project directory on a background thread

mod cache;
mod loader;
mod project;
mod storage;

pub use cache::{ProjectCache, LATEST_CODE_KEY, PROJECT_KEY};
pub use loader::{spawn_dir_loader, LoadEvent};
pub use project::{Project, DEFAULT_SKETCH, MAIN_FILE_NAME};
pub use storage::LocalStorage;
