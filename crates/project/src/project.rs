//! In-memory project.

use std::rc::Rc;

use sketchpad_core::{FileRecord, SharedFile};

/// File opened when a project starts.
pub const MAIN_FILE_NAME: &str = "sketch.js";

/// Contents of a new sketch.
pub const DEFAULT_SKETCH: &str = "function setup() {\n  createCanvas(400, 400);\n}\n\nfunction draw() {\n  background(220);\n}\n";

/// Ordered collection of project files.
#[derive(Debug, Default)]
pub struct Project {
    files: Vec<SharedFile>,
}

impl Project {
    /// Create an empty project.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a project holding only the default sketch.
    pub fn with_default_sketch() -> Self {
        let mut project = Self::new();
        project.add(FileRecord::from_name(MAIN_FILE_NAME, DEFAULT_SKETCH));
        project
    }

    /// Add a file, returning its shared handle.
    ///
    /// A file with an already used name replaces the contents of the
    /// existing record, so handles held elsewhere stay valid.
    pub fn add(&mut self, file: FileRecord) -> SharedFile {
        if let Some(existing) = self.file(&file.name) {
            *existing.borrow_mut() = file;
            return existing;
        }
        let shared = file.into_shared();
        self.files.push(Rc::clone(&shared));
        shared
    }

    /// Find a file by name.
    pub fn file(&self, name: &str) -> Option<SharedFile> {
        self.files
            .iter()
            .find(|f| f.borrow().name == name)
            .cloned()
    }

    /// Position of a file by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.borrow().name == name)
    }

    /// File to open first: the main sketch if present, else the first file.
    pub fn main_file(&self) -> Option<SharedFile> {
        self.file(MAIN_FILE_NAME)
            .or_else(|| self.files.first().cloned())
    }

    pub fn files(&self) -> &[SharedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Copy of every record, in project order.
    pub fn snapshot(&self) -> Vec<FileRecord> {
        self.files.iter().map(|f| f.borrow().clone()).collect()
    }
}
