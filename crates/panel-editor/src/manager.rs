use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use sketchpad_core::{
    EditorMessage, EditorSettings, EditorWidget, FileRecord, HostRequest, Mode, PersistenceSink,
    SessionId, SettingsProvider, SharedFile, ThemeKind,
};

use crate::constants::{EDITOR_COMMANDS, RESTORE_CURSOR};
use crate::{EditorError, ManagerOptions};

/// Sending half of the loaded-file bridge.
pub type LoadedFileSender = Sender<FileRecord>;

/// Widget buffer registered for a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub name: String,
    pub document: SessionId,
}

/// Maps project files to widget buffers.
///
/// At most one session exists per file name. Sessions are created on the
/// first open of a name and dropped on close; the buffers themselves belong
/// to the widget and are destroyed once nothing shows them.
pub struct EditorManager<W: EditorWidget> {
    widget: W,
    settings: Rc<dyn SettingsProvider>,
    sink: Rc<dyn PersistenceSink>,
    options: ManagerOptions,
    sessions: HashMap<String, EditSession>,
    /// Name of the file bound to the surface (None after clear)
    bound: Option<String>,
    /// Buffers with no session that stay alive while the surface shows them
    detached: Vec<SessionId>,
    /// Set until the first successful open
    new_project: bool,
    loaded_tx: Sender<FileRecord>,
    loaded_rx: Receiver<FileRecord>,
}

impl<W: EditorWidget> EditorManager<W> {
    /// Create a manager around a widget.
    ///
    /// The surface starts read-only with the light theme until a file is
    /// opened.
    pub fn new(
        widget: W,
        settings: Rc<dyn SettingsProvider>,
        sink: Rc<dyn PersistenceSink>,
        options: ManagerOptions,
    ) -> Self {
        let (loaded_tx, loaded_rx) = mpsc::channel();
        let mut manager = Self {
            widget,
            settings,
            sink,
            options,
            sessions: HashMap::new(),
            bound: None,
            detached: Vec::new(),
            new_project: true,
            loaded_tx,
            loaded_rx,
        };
        manager.widget.set_theme(ThemeKind::Light);
        manager.widget.set_read_only(true);
        manager.customize_commands();
        manager
    }

    /// Handle one host message to completion.
    pub fn dispatch(&mut self, message: EditorMessage) -> Result<(), EditorError> {
        match message {
            EditorMessage::OpenFile(file) => return self.open_file(file),
            EditorMessage::CloseFile(name) => self.close_file(&name),
            EditorMessage::ClearEditor => self.clear_editor(),
            EditorMessage::SettingsChanged(settings) => self.settings_changed(&settings),
        }
        Ok(())
    }

    /// Bind a file to the surface, creating its session on first open.
    pub fn open_file(&mut self, file: Option<SharedFile>) -> Result<(), EditorError> {
        let Some(file) = file else {
            log::error!("{}", EditorError::MissingFile);
            return Err(EditorError::MissingFile);
        };

        let (name, id) = {
            let record = file.borrow();
            let id = match self.sessions.get(&record.name) {
                Some(session) => session.document,
                None => {
                    let mode = Mode::resolve(&record.extension);
                    let id = self.widget.create_session(&record.contents, mode);
                    log::debug!("Created {} session for '{}'", mode, record.name);
                    id
                }
            };
            (record.name.clone(), id)
        };

        self.widget.set_session(id);
        self.release_detached();
        self.install_listener(id, &file);
        self.sessions
            .entry(name.clone())
            .or_insert_with(|| EditSession {
                name: name.clone(),
                document: id,
            });

        if self.new_project {
            self.new_project = false;
            if self.options.restore_latest_code {
                self.restore_latest_code(id);
            }
        }

        self.widget.set_read_only(false);
        let settings = self.settings.settings();
        self.update_settings(&settings);
        self.widget.focus();

        log::info!("Opened '{}' in editor", name);
        self.bound = Some(name);
        Ok(())
    }

    /// Drop the session registered for `name`, if any.
    ///
    /// A background buffer is destroyed at once. The bound buffer stays on
    /// the surface until the next bind, read-only if the manager was built
    /// with `read_only_on_active_close`.
    pub fn close_file(&mut self, name: &str) {
        let Some(session) = self.sessions.remove(name) else {
            log::debug!("Close of '{}' ignored: no session", name);
            return;
        };
        log::debug!("Closed session for '{}'", name);

        if self.widget.active_session() == Some(session.document) {
            self.detached.push(session.document);
        } else {
            self.widget.destroy_session(session.document);
        }

        if self.options.read_only_on_active_close && self.bound.as_deref() == Some(name) {
            self.widget.set_read_only(true);
            self.bound = None;
        }
    }

    /// Bind a fresh empty JavaScript buffer. The registry is untouched.
    ///
    /// The scratch buffer lives until the next bind replaces it.
    pub fn clear_editor(&mut self) {
        let id = self.widget.create_session("", Mode::JavaScript);
        self.widget.set_session(id);
        self.release_detached();
        self.detached.push(id);
        self.bound = None;
    }

    /// Apply settings pushed by the host.
    pub fn settings_changed(&mut self, settings: &EditorSettings) {
        self.update_settings(settings);
    }

    /// Apply settings to the surface and the bound buffer.
    ///
    /// Only "light-theme" and "dark-theme" select a palette; any other
    /// theme value leaves the current one in place.
    pub fn update_settings(&mut self, settings: &EditorSettings) {
        let settings = settings.normalized();
        self.widget.set_tab_size(settings.tab_size);
        self.widget.set_use_soft_tabs(settings.soft_tabs);
        self.widget.set_use_wrap_mode(settings.word_wrap);
        match ThemeKind::from_selector(&settings.editor_theme) {
            Some(theme) => self.widget.set_theme(theme),
            None => log::debug!("Unknown editor theme '{}', keeping current", settings.editor_theme),
        }
    }

    /// Register the editor key bindings with the widget.
    pub fn customize_commands(&mut self) {
        for command in EDITOR_COMMANDS {
            self.widget.add_command(command);
        }
    }

    /// Sender for files loaded outside the event loop.
    pub fn loaded_file_sender(&self) -> LoadedFileSender {
        self.loaded_tx.clone()
    }

    /// Open every file received through the loaded-file bridge.
    ///
    /// `adopt` hands each record to the project layer and returns the shared
    /// handle the session writes back to. Every pending record is adopted
    /// before the first open, so a save triggered by restoring cached code
    /// already sees the whole batch. Returns the number of files opened.
    pub fn process_loaded_files<F>(&mut self, adopt: F) -> usize
    where
        F: FnMut(FileRecord) -> SharedFile,
    {
        let files: Vec<SharedFile> = self.loaded_rx.try_iter().map(adopt).collect();
        files
            .into_iter()
            .filter(|file| self.open_file(Some(Rc::clone(file))).is_ok())
            .count()
    }

    pub fn has_session(&self, name: &str) -> bool {
        self.sessions.contains_key(name)
    }

    pub fn session(&self, name: &str) -> Option<&EditSession> {
        self.sessions.get(name)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Name of the file bound to the surface.
    pub fn bound_file(&self) -> Option<&str> {
        self.bound.as_deref()
    }

    pub fn is_editable(&self) -> bool {
        !self.widget.is_read_only()
    }

    /// Whether the cached code has not been considered yet.
    pub fn is_new_project(&self) -> bool {
        self.new_project
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    /// Drain requests raised by editor commands.
    pub fn take_host_requests(&mut self) -> Vec<HostRequest> {
        self.widget.take_host_requests()
    }

    /// Subscribe a buffer to write back into its file record.
    ///
    /// Replaces any previous listener, so each edit saves exactly once.
    fn install_listener(&mut self, id: SessionId, file: &SharedFile) {
        let file = Rc::clone(file);
        let sink = Rc::clone(&self.sink);
        self.widget.set_change_listener(
            id,
            Box::new(move |text: &str| {
                file.borrow_mut().contents = text.to_string();
                sink.save_project(&file.borrow());
            }),
        );
    }

    /// Destroy detached buffers the surface no longer shows.
    fn release_detached(&mut self) {
        let active = self.widget.active_session();
        for id in std::mem::take(&mut self.detached) {
            if Some(id) == active {
                self.detached.push(id);
            } else {
                self.widget.destroy_session(id);
            }
        }
    }

    fn restore_latest_code(&mut self, id: SessionId) {
        let Some(code) = self.sink.latest_code() else {
            return;
        };
        log::info!("Restoring cached code ({} bytes)", code.len());
        // Goes through the listener like any other edit
        self.widget.set_value(id, &code);
        let (line, column) = RESTORE_CURSOR;
        self.widget.goto_line(line, column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use sketchpad_core::{EditorWidget, SessionOptions};
    use sketchpad_keyboard::Platform;
    use sketchpad_widget::{Cursor, TextWidget};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct RecordingSink {
        saves: RefCell<Vec<FileRecord>>,
        cached: RefCell<Option<String>>,
        reads: Cell<usize>,
    }

    impl PersistenceSink for RecordingSink {
        fn save_project(&self, edited: &FileRecord) {
            self.saves.borrow_mut().push(edited.clone());
        }

        fn latest_code(&self) -> Option<String> {
            self.reads.set(self.reads.get() + 1);
            self.cached.borrow().clone()
        }
    }

    struct Fixture {
        manager: EditorManager<TextWidget>,
        sink: Rc<RecordingSink>,
        settings: Rc<RefCell<EditorSettings>>,
    }

    fn fixture_with(cached: Option<&str>, options: ManagerOptions) -> Fixture {
        let sink = Rc::new(RecordingSink::default());
        *sink.cached.borrow_mut() = cached.map(str::to_string);
        let settings = Rc::new(RefCell::new(EditorSettings::default()));

        let dyn_sink: Rc<dyn PersistenceSink> = sink.clone();
        let dyn_settings: Rc<dyn SettingsProvider> = settings.clone();
        let manager = EditorManager::new(
            TextWidget::for_platform(Platform::Win),
            dyn_settings,
            dyn_sink,
            options,
        );
        Fixture {
            manager,
            sink,
            settings,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(None, ManagerOptions::default())
    }

    fn file(name: &str, contents: &str) -> SharedFile {
        FileRecord::from_name(name, contents).into_shared()
    }

    fn active_mode(manager: &EditorManager<TextWidget>) -> Option<Mode> {
        let id = manager.widget().active_session()?;
        manager.widget().session_mode(id)
    }

    fn active_text(manager: &EditorManager<TextWidget>) -> Option<String> {
        let id = manager.widget().active_session()?;
        manager.widget().session_text(id)
    }

    fn active_options(manager: &EditorManager<TextWidget>) -> Option<SessionOptions> {
        let id = manager.widget().active_session()?;
        manager.widget().session_options(id)
    }

    #[test]
    fn test_starts_read_only_with_commands() {
        let f = fixture();
        assert!(!f.manager.is_editable());
        assert!(f.manager.is_new_project());
        assert_eq!(f.manager.widget().theme(), ThemeKind::Light);
        assert_eq!(
            f.manager.widget().command_names(),
            vec!["find", "findnext", "findprevious", "blockoutdent", "blockindent", "Preferences"]
        );
    }

    #[test]
    fn test_open_missing_file_changes_nothing() {
        let mut f = fixture();
        assert_eq!(f.manager.open_file(None), Err(EditorError::MissingFile));
        assert_eq!(f.manager.session_count(), 0);
        assert!(!f.manager.is_editable());
        assert!(f.manager.is_new_project());
        assert_eq!(f.manager.widget().active_session(), None);
    }

    #[test]
    fn test_mode_per_extension() {
        let cases = [
            ("index.html", Mode::Html),
            ("page.htm", Mode::Html),
            ("sketch.js", Mode::JavaScript),
            ("style.css", Mode::Css),
            ("data.json", Mode::Json),
            ("notes.txt", Mode::Text),
            ("SKETCH.JS", Mode::JavaScript),
            ("shader.frag", Mode::Text),
            ("README", Mode::Text),
        ];
        let mut f = fixture();
        for (name, mode) in cases {
            f.manager.open_file(Some(file(name, ""))).unwrap();
            assert_eq!(active_mode(&f.manager), Some(mode), "{}", name);
        }
        assert_eq!(f.manager.session_count(), cases.len());
    }

    #[test]
    fn test_open_binds_contents_and_enables_editing() {
        let mut f = fixture();
        f.manager.open_file(Some(file("sketch.js", "let x = 1;"))).unwrap();

        assert_eq!(active_text(&f.manager).as_deref(), Some("let x = 1;"));
        assert!(f.manager.is_editable());
        assert!(f.manager.widget().is_focused());
        assert_eq!(f.manager.bound_file(), Some("sketch.js"));
        assert!(f.sink.saves.borrow().is_empty());
    }

    #[test]
    fn test_reopen_reuses_session() {
        let mut f = fixture();
        let sketch = file("sketch.js", "a");
        f.manager.open_file(Some(Rc::clone(&sketch))).unwrap();
        let first = f.manager.session("sketch.js").unwrap().document;

        f.manager.open_file(Some(file("style.css", "b"))).unwrap();
        f.manager.open_file(Some(Rc::clone(&sketch))).unwrap();

        assert_eq!(f.manager.session_count(), 2);
        assert_eq!(f.manager.widget().active_session(), Some(first));
        assert_eq!(f.manager.widget().session_count(), 2);
    }

    #[test]
    fn test_reopen_keeps_buffer_edits() {
        let mut f = fixture();
        let sketch = file("sketch.js", "");
        f.manager.open_file(Some(Rc::clone(&sketch))).unwrap();
        f.manager.widget_mut().insert_text("draw();");

        // A stale record with the same name still binds the live buffer
        f.manager.open_file(Some(file("sketch.js", "old"))).unwrap();
        assert_eq!(active_text(&f.manager).as_deref(), Some("draw();"));
    }

    #[test]
    fn test_edit_writes_back_and_saves_once() {
        let mut f = fixture();
        let sketch = file("sketch.js", "");
        f.manager.open_file(Some(Rc::clone(&sketch))).unwrap();

        f.manager.widget_mut().insert_text("x");
        assert_eq!(sketch.borrow().contents, "x");
        assert_eq!(f.sink.saves.borrow().len(), 1);
        assert_eq!(f.sink.saves.borrow()[0].contents, "x");

        f.manager.widget_mut().insert_text("y");
        assert_eq!(sketch.borrow().contents, "xy");
        assert_eq!(f.sink.saves.borrow().len(), 2);
    }

    #[test]
    fn test_reopen_does_not_double_fire() {
        let mut f = fixture();
        let sketch = file("sketch.js", "");
        for _ in 0..3 {
            f.manager.open_file(Some(Rc::clone(&sketch))).unwrap();
        }
        f.manager.widget_mut().insert_text("z");
        assert_eq!(f.sink.saves.borrow().len(), 1);
    }

    #[test]
    fn test_background_session_keeps_own_record() {
        let mut f = fixture();
        let sketch = file("sketch.js", "");
        let style = file("style.css", "");
        f.manager.open_file(Some(Rc::clone(&sketch))).unwrap();
        f.manager.open_file(Some(Rc::clone(&style))).unwrap();

        f.manager.widget_mut().insert_text("body {}");
        assert_eq!(style.borrow().contents, "body {}");
        assert_eq!(sketch.borrow().contents, "");
        assert_eq!(f.sink.saves.borrow()[0].name, "style.css");
    }

    #[test]
    fn test_close_removes_exactly_one() {
        let mut f = fixture();
        f.manager.open_file(Some(file("a.js", ""))).unwrap();
        f.manager.open_file(Some(file("b.js", ""))).unwrap();

        f.manager.close_file("a.js");
        assert!(!f.manager.has_session("a.js"));
        assert!(f.manager.has_session("b.js"));
        assert_eq!(f.manager.session_count(), 1);
    }

    #[test]
    fn test_close_background_file_frees_buffer() {
        let mut f = fixture();
        f.manager.open_file(Some(file("a.js", ""))).unwrap();
        f.manager.open_file(Some(file("b.js", ""))).unwrap();
        let a = f.manager.session("a.js").unwrap().document;

        f.manager.close_file("a.js");
        assert_eq!(f.manager.widget().session_count(), 1);
        assert_eq!(f.manager.widget().session_text(a), None);
    }

    #[test]
    fn test_closed_bound_buffer_freed_on_next_bind() {
        let mut f = fixture();
        f.manager.open_file(Some(file("a.js", "a"))).unwrap();
        f.manager.close_file("a.js");
        assert_eq!(f.manager.widget().session_count(), 1);

        f.manager.open_file(Some(file("b.js", "b"))).unwrap();
        assert_eq!(f.manager.widget().session_count(), 1);
        assert_eq!(active_text(&f.manager).as_deref(), Some("b"));
    }

    #[test]
    fn test_open_close_clear_cycle_stays_bounded() {
        let mut f = fixture();
        let sketch = file("a.js", "x");
        for _ in 0..100 {
            f.manager.open_file(Some(Rc::clone(&sketch))).unwrap();
            f.manager.close_file("a.js");
            f.manager.clear_editor();
        }
        assert_eq!(f.manager.session_count(), 0);
        assert_eq!(f.manager.widget().session_count(), 1);
        assert_eq!(active_text(&f.manager).as_deref(), Some(""));
    }

    #[test]
    fn test_repeated_clear_frees_previous_scratch() {
        let mut f = fixture();
        f.manager.open_file(Some(file("sketch.js", ""))).unwrap();
        f.manager.clear_editor();
        f.manager.clear_editor();
        assert_eq!(f.manager.widget().session_count(), 2);

        // Scratch buffer is dropped when a file is bound again
        f.manager.open_file(Some(file("sketch.js", ""))).unwrap();
        assert_eq!(f.manager.widget().session_count(), 1);
    }

    #[test]
    fn test_close_unknown_is_noop() {
        let mut f = fixture();
        f.manager.open_file(Some(file("a.js", ""))).unwrap();
        f.manager.close_file("missing.js");
        assert_eq!(f.manager.session_count(), 1);
        assert!(f.manager.is_editable());
    }

    #[test]
    fn test_close_bound_file_keeps_surface_by_default() {
        let mut f = fixture();
        f.manager.open_file(Some(file("a.js", "keep"))).unwrap();
        f.manager.close_file("a.js");

        assert!(f.manager.is_editable());
        assert_eq!(active_text(&f.manager).as_deref(), Some("keep"));
    }

    #[test]
    fn test_close_bound_file_read_only_when_configured() {
        let options = ManagerOptions {
            read_only_on_active_close: true,
            ..ManagerOptions::default()
        };
        let mut f = fixture_with(None, options);
        f.manager.open_file(Some(file("a.js", ""))).unwrap();
        f.manager.open_file(Some(file("b.js", ""))).unwrap();

        f.manager.close_file("a.js");
        assert!(f.manager.is_editable());

        f.manager.close_file("b.js");
        assert!(!f.manager.is_editable());
        assert_eq!(f.manager.bound_file(), None);
    }

    #[test]
    fn test_reopen_after_close_creates_new_session() {
        let mut f = fixture();
        let sketch = file("sketch.js", "v1");
        f.manager.open_file(Some(Rc::clone(&sketch))).unwrap();
        let first = f.manager.session("sketch.js").unwrap().document;

        f.manager.close_file("sketch.js");
        f.manager.open_file(Some(sketch)).unwrap();
        let second = f.manager.session("sketch.js").unwrap().document;
        assert_ne!(first, second);
    }

    #[test]
    fn test_restore_cached_code_on_first_open() {
        let mut f = fixture_with(Some("line one\nline two\n"), ManagerOptions::default());
        let sketch = file("sketch.js", "initial");
        f.manager.open_file(Some(Rc::clone(&sketch))).unwrap();

        assert_eq!(active_text(&f.manager).as_deref(), Some("line one\nline two\n"));
        assert_eq!(sketch.borrow().contents, "line one\nline two\n");
        assert_eq!(f.sink.saves.borrow().len(), 1);
        assert_eq!(f.manager.widget().cursor(), Some(Cursor::at(1, 2)));
        assert!(!f.manager.is_new_project());
    }

    #[test]
    fn test_restore_cursor_is_clamped() {
        let mut f = fixture_with(Some("x"), ManagerOptions::default());
        f.manager.open_file(Some(file("sketch.js", ""))).unwrap();
        assert_eq!(f.manager.widget().cursor(), Some(Cursor::at(0, 1)));
    }

    #[test]
    fn test_restore_happens_once() {
        let mut f = fixture_with(Some("cached"), ManagerOptions::default());
        f.manager.open_file(Some(file("a.js", "a"))).unwrap();
        f.manager.open_file(Some(file("b.js", "b"))).unwrap();

        assert_eq!(active_text(&f.manager).as_deref(), Some("b"));
        assert_eq!(f.sink.reads.get(), 1);
    }

    #[test]
    fn test_flag_consumed_without_blob() {
        let mut f = fixture();
        f.manager.open_file(Some(file("a.js", "a"))).unwrap();
        assert!(!f.manager.is_new_project());

        *f.sink.cached.borrow_mut() = Some("late".to_string());
        f.manager.open_file(Some(file("b.js", "b"))).unwrap();
        assert_eq!(active_text(&f.manager).as_deref(), Some("b"));
        assert_eq!(f.sink.reads.get(), 1);
    }

    #[test]
    fn test_restore_disabled() {
        let options = ManagerOptions {
            restore_latest_code: false,
            ..ManagerOptions::default()
        };
        let mut f = fixture_with(Some("cached"), options);
        f.manager.open_file(Some(file("a.js", "a"))).unwrap();

        assert_eq!(active_text(&f.manager).as_deref(), Some("a"));
        assert_eq!(f.sink.reads.get(), 0);
        assert!(!f.manager.is_new_project());
    }

    #[test]
    fn test_open_applies_current_settings() {
        let mut f = fixture();
        *f.settings.borrow_mut() = EditorSettings {
            tab_size: 2,
            soft_tabs: false,
            word_wrap: true,
            editor_theme: "dark-theme".to_string(),
        };
        f.manager.open_file(Some(file("a.js", ""))).unwrap();

        let options = active_options(&f.manager).unwrap();
        assert_eq!(options.tab_size, 2);
        assert!(!options.soft_tabs);
        assert!(options.word_wrap);
        assert_eq!(f.manager.widget().theme(), ThemeKind::Dark);
    }

    #[test]
    fn test_update_settings_is_idempotent() {
        let mut f = fixture();
        f.manager.open_file(Some(file("a.js", ""))).unwrap();
        let settings = EditorSettings {
            tab_size: 8,
            soft_tabs: true,
            word_wrap: false,
            editor_theme: "dark-theme".to_string(),
        };

        f.manager.update_settings(&settings);
        let once = (active_options(&f.manager), f.manager.widget().theme());
        f.manager.update_settings(&settings);
        let twice = (active_options(&f.manager), f.manager.widget().theme());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_theme_keeps_current() {
        let mut f = fixture();
        let mut settings = EditorSettings {
            editor_theme: "dark-theme".to_string(),
            ..EditorSettings::default()
        };
        f.manager.settings_changed(&settings);
        assert_eq!(f.manager.widget().theme(), ThemeKind::Dark);

        settings.editor_theme = "solarized".to_string();
        f.manager.settings_changed(&settings);
        assert_eq!(f.manager.widget().theme(), ThemeKind::Dark);
    }

    #[test]
    fn test_zero_tab_size_is_clamped() {
        let mut f = fixture();
        f.manager.open_file(Some(file("a.js", ""))).unwrap();
        let settings = EditorSettings {
            tab_size: 0,
            ..EditorSettings::default()
        };
        f.manager.update_settings(&settings);
        assert_eq!(active_options(&f.manager).unwrap().tab_size, 1);
    }

    #[test]
    fn test_clear_editor_keeps_registry() {
        let mut f = fixture();
        f.manager.open_file(Some(file("index.html", "<p>"))).unwrap();
        f.manager.open_file(Some(file("sketch.js", "x"))).unwrap();

        f.manager.clear_editor();
        assert_eq!(f.manager.session_count(), 2);
        assert_eq!(active_text(&f.manager).as_deref(), Some(""));
        assert_eq!(active_mode(&f.manager), Some(Mode::JavaScript));
        assert_eq!(f.manager.bound_file(), None);

        // Scratch buffer edits are not persisted
        f.manager.widget_mut().insert_text("scratch");
        assert!(f.sink.saves.borrow().is_empty());
    }

    #[test]
    fn test_dispatch_routes_messages() {
        let mut f = fixture();
        let sketch = file("sketch.js", "");
        assert_eq!(
            f.manager.dispatch(EditorMessage::OpenFile(None)),
            Err(EditorError::MissingFile)
        );
        f.manager
            .dispatch(EditorMessage::OpenFile(Some(sketch)))
            .unwrap();
        assert!(f.manager.has_session("sketch.js"));

        let dark = EditorSettings {
            editor_theme: "dark-theme".to_string(),
            ..EditorSettings::default()
        };
        f.manager
            .dispatch(EditorMessage::SettingsChanged(dark))
            .unwrap();
        assert_eq!(f.manager.widget().theme(), ThemeKind::Dark);

        f.manager.dispatch(EditorMessage::ClearEditor).unwrap();
        assert_eq!(f.manager.bound_file(), None);

        f.manager
            .dispatch(EditorMessage::CloseFile("sketch.js".to_string()))
            .unwrap();
        assert_eq!(f.manager.session_count(), 0);
    }

    #[test]
    fn test_preferences_key_raises_host_request() {
        let mut f = fixture();
        let key = KeyEvent::new(KeyCode::Char(','), KeyModifiers::CONTROL);
        assert!(f.manager.widget_mut().handle_key(key));
        assert_eq!(
            f.manager.take_host_requests(),
            vec![HostRequest::ToggleSettingsPane]
        );
        assert!(f.manager.take_host_requests().is_empty());
    }

    #[test]
    fn test_block_indent_commands_edit_and_save() {
        let mut f = fixture();
        let sketch = file("sketch.js", "x");
        f.manager.open_file(Some(Rc::clone(&sketch))).unwrap();

        let indent = KeyEvent::new(KeyCode::Char(']'), KeyModifiers::CONTROL);
        f.manager.widget_mut().handle_key(indent);
        assert_eq!(sketch.borrow().contents, "    x");

        let outdent = KeyEvent::new(KeyCode::Char('['), KeyModifiers::CONTROL);
        f.manager.widget_mut().handle_key(outdent);
        assert_eq!(sketch.borrow().contents, "x");
        assert_eq!(f.sink.saves.borrow().len(), 2);
    }

    #[test]
    fn test_loaded_files_are_opened() {
        let mut f = fixture();
        let sender = f.manager.loaded_file_sender();
        sender
            .send(FileRecord::from_name("index.html", "<html>"))
            .unwrap();
        sender
            .send(FileRecord::from_name("sketch.js", "draw();"))
            .unwrap();

        let mut adopted = Vec::new();
        let opened = f.manager.process_loaded_files(|record| {
            let shared = record.into_shared();
            adopted.push(Rc::clone(&shared));
            shared
        });

        assert_eq!(opened, 2);
        assert_eq!(f.manager.session_count(), 2);
        assert_eq!(f.manager.bound_file(), Some("sketch.js"));

        f.manager.widget_mut().insert_text("//");
        assert_eq!(adopted[1].borrow().contents, "//draw();");
        assert_eq!(f.manager.process_loaded_files(|r| r.into_shared()), 0);
    }

    #[test]
    fn test_loaded_batch_adopted_before_restore_save() {
        let mut f = fixture_with(Some("y=2"), ManagerOptions::default());
        let sender = f.manager.loaded_file_sender();
        sender
            .send(FileRecord::from_name("sketch.js", "x=1"))
            .unwrap();
        sender
            .send(FileRecord::from_name("index.html", "<html>"))
            .unwrap();

        // Restoring on the first open saves; no record may arrive after that
        let sink = Rc::clone(&f.sink);
        let opened = f.manager.process_loaded_files(|record| {
            assert!(sink.saves.borrow().is_empty(), "'{}' adopted after a save", record.name);
            record.into_shared()
        });

        assert_eq!(opened, 2);
        let saves = f.sink.saves.borrow();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].name, "sketch.js");
        assert_eq!(saves[0].contents, "y=2");
    }
}
