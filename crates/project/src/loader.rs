//! Background loading of a project directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{Context, Result};
use sketchpad_core::FileRecord;

/// Progress of a directory load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    /// One file was read
    File(FileRecord),
    /// Loading finished (also sent after errors)
    Done,
}

/// Read the files of `dir` (non-recursive, sorted by name) on a thread.
///
/// Unreadable and non-UTF-8 files are skipped with a warning.
pub fn spawn_dir_loader(dir: PathBuf) -> Receiver<LoadEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        if let Err(e) = load_dir(&dir, &tx) {
            log::error!("Failed to load project {}: {:#}", dir.display(), e);
        }
        let _ = tx.send(LoadEvent::Done);
    });
    rx
}

fn load_dir(dir: &Path, tx: &Sender<LoadEvent>) -> Result<()> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match fs::read_to_string(&path) {
            Ok(contents) => {
                if tx.send(LoadEvent::File(FileRecord::from_name(name, contents))).is_err() {
                    // Receiver dropped, nobody is waiting anymore
                    return Ok(());
                }
            }
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }
    Ok(())
}
