//! Logging infrastructure for sketchpad.
//!
//! Installs a `log` facade backend that writes every record to a log file
//! and keeps the most recent entries in memory so the host can show them.
//! Library crates only depend on `log` and use its macros.

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Timestamp in HH:MM:SS format
    pub timestamp: String,
    /// Message level
    pub level: Level,
    /// Module that produced the record
    pub target: String,
    /// Message text
    pub message: String,
}

/// Parse a level name from the config file.
///
/// Unknown names fall back to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    match name.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" | "warning" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Logger state shared behind the facade
#[derive(Debug)]
struct LogStore {
    /// Last N messages
    entries: VecDeque<LogEntry>,
    /// Maximum number of entries kept in memory
    max_entries: usize,
    /// Log file path (None = memory only)
    file_path: Option<PathBuf>,
}

impl LogStore {
    fn new(file_path: Option<PathBuf>, max_entries: usize) -> Self {
        if let Some(path) = &file_path {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }

            // Clear log file on startup
            if let Ok(mut file) = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
            {
                let _ = writeln!(file, "=== Sketchpad Log Start ===");
            }
        }

        Self {
            entries: VecDeque::new(),
            max_entries,
            file_path,
        }
    }

    fn push(&mut self, entry: LogEntry) {
        if let Some(path) = &self.file_path {
            // Write to file (create if deleted)
            if let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) {
                let _ = writeln!(
                    file,
                    "[{}] {} {}: {}",
                    entry.timestamp, entry.level, entry.target, entry.message
                );
            }
        }

        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }
}

/// `log` backend with file output and an in-memory ring buffer.
#[derive(Debug)]
pub struct SketchpadLogger {
    store: Mutex<LogStore>,
    level: LevelFilter,
}

impl SketchpadLogger {
    /// Create a logger without installing it.
    pub fn new(file_path: Option<PathBuf>, max_entries: usize, level: LevelFilter) -> Self {
        Self {
            store: Mutex::new(LogStore::new(file_path, max_entries)),
            level,
        }
    }

    /// Get all log entries currently kept in memory.
    pub fn entries(&self) -> Vec<LogEntry> {
        match self.store.lock() {
            Ok(store) => store.entries.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Log for SketchpadLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };

        if let Ok(mut store) = self.store.lock() {
            store.push(entry);
        }
    }

    fn flush(&self) {}
}

/// Global logger instance that persists for the application lifetime.
static LOGGER: OnceLock<SketchpadLogger> = OnceLock::new();

/// Initialize the global logger and install it as the `log` backend.
///
/// Must be called once at application startup.
/// Subsequent calls are ignored.
///
/// # Arguments
///
/// * `file_path` - Path to the log file (None keeps logs in memory only)
/// * `max_entries` - Maximum number of log entries to keep in memory
/// * `level` - Minimum level to record
pub fn init(file_path: Option<PathBuf>, max_entries: usize, level: LevelFilter) {
    if LOGGER.get().is_some() {
        return;
    }
    let logger = LOGGER.get_or_init(|| SketchpadLogger::new(file_path, max_entries, level));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

/// Get all log entries recorded by the global logger.
///
/// Returns an empty list before `init` is called.
pub fn get_entries() -> Vec<LogEntry> {
    LOGGER.get().map(|l| l.entries()).unwrap_or_default()
}
