//! Project persistence into local storage.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use sketchpad_core::{FileRecord, PersistenceSink};

use crate::{LocalStorage, Project};

/// Storage key of the most recently edited buffer text (JSON string).
pub const LATEST_CODE_KEY: &str = "latestCode";

/// Storage key of the project snapshot (JSON array of file records).
pub const PROJECT_KEY: &str = "project";

/// Save requested but not yet written.
#[derive(Debug)]
struct PendingSave {
    requested_at: Instant,
    latest_code: String,
}

/// `PersistenceSink` writing the whole project to `LocalStorage`.
///
/// With a zero debounce every request is written immediately. Otherwise the
/// write happens once requests have been quiet for the debounce period; the
/// host drives this by calling `flush_due` from its tick.
#[derive(Debug)]
pub struct ProjectCache {
    storage: LocalStorage,
    project: Rc<RefCell<Project>>,
    debounce: Duration,
    pending: RefCell<Option<PendingSave>>,
}

impl ProjectCache {
    pub fn new(storage: LocalStorage, project: Rc<RefCell<Project>>, debounce: Duration) -> Self {
        Self {
            storage,
            project,
            debounce,
            pending: RefCell::new(None),
        }
    }

    /// Storage this cache writes to.
    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Write a pending save once the debounce period has passed.
    ///
    /// Returns `true` if a write happened.
    pub fn flush_due(&self) -> bool {
        let due = self
            .pending
            .borrow()
            .as_ref()
            .is_some_and(|p| p.requested_at.elapsed() >= self.debounce);
        if due {
            self.flush();
        }
        due
    }

    /// Write a pending save now.
    pub fn flush(&self) {
        let pending = self.pending.borrow_mut().take();
        if let Some(pending) = pending {
            self.write(&pending.latest_code);
        }
    }

    fn write(&self, latest_code: &str) {
        if let Err(e) = self.try_write(latest_code) {
            log::error!("Failed to save project to local storage: {:#}", e);
        }
    }

    fn try_write(&self, latest_code: &str) -> Result<()> {
        let snapshot = self.project.borrow().snapshot();
        self.storage
            .set_item(LATEST_CODE_KEY, &serde_json::to_string(latest_code)?)?;
        self.storage
            .set_item(PROJECT_KEY, &serde_json::to_string(&snapshot)?)?;
        log::debug!("Saved project ({} files) to local storage", snapshot.len());
        Ok(())
    }

    /// Read the project snapshot written by a previous run.
    pub fn load_snapshot(&self) -> Option<Vec<FileRecord>> {
        let raw = match self.storage.get_item(PROJECT_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Failed to read project snapshot: {:#}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(files) => Some(files),
            Err(e) => {
                log::warn!("Ignoring malformed project snapshot: {}", e);
                None
            }
        }
    }
}

impl PersistenceSink for ProjectCache {
    fn save_project(&self, edited: &FileRecord) {
        if self.debounce.is_zero() {
            self.write(&edited.contents);
            return;
        }
        *self.pending.borrow_mut() = Some(PendingSave {
            requested_at: Instant::now(),
            latest_code: edited.contents.clone(),
        });
    }

    fn latest_code(&self) -> Option<String> {
        let raw = match self.storage.get_item(LATEST_CODE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Failed to read cached code: {:#}", e);
                return None;
            }
        };
        match serde_json::from_str::<String>(&raw) {
            Ok(code) => Some(code),
            Err(e) => {
                log::warn!("Ignoring malformed cached code: {}", e);
                None
            }
        }
    }
}
