//! Host application: owns the project, the cache and the editor manager.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use sketchpad_config::Config;
use sketchpad_core::{
    EditorMessage, EditorSettings, FileRecord, HostRequest, PersistenceSink, SettingsProvider,
    SharedFile,
};
use sketchpad_panel_editor::{EditorManager, ManagerOptions};
use sketchpad_project::{
    spawn_dir_loader, LoadEvent, LocalStorage, Project, ProjectCache, MAIN_FILE_NAME,
};
use sketchpad_widget::TextWidget;

use crate::hotkeys::{HostAction, PaneAction};
use crate::ui;

/// Event poll interval; also drives debounced saves.
const TICK: Duration = Duration::from_millis(100);

/// Status line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    config: Config,
    /// Where settings changes are written (None keeps them in memory)
    config_path: Option<PathBuf>,
    settings: Rc<RefCell<EditorSettings>>,
    pub(crate) project: Rc<RefCell<Project>>,
    cache: Rc<ProjectCache>,
    pub(crate) manager: EditorManager<TextWidget>,
    loader: Option<Receiver<LoadEvent>>,
    loaded: Vec<FileRecord>,
    pub(crate) settings_pane: bool,
    pub(crate) status: Option<StatusMessage>,
    should_quit: bool,
    needs_redraw: bool,
}

impl App {
    /// Build the host and start loading `project_dir` in the background.
    pub fn new(config: Config, config_path: Option<PathBuf>, project_dir: PathBuf) -> Result<Self> {
        let settings = Rc::new(RefCell::new(config.editor.normalized()));
        let project = Rc::new(RefCell::new(Project::new()));
        let storage = LocalStorage::new(config.project_storage_dir(&project_dir)?);
        log::debug!("Project storage at {}", storage.dir().display());
        let cache = Rc::new(ProjectCache::new(
            storage,
            Rc::clone(&project),
            Duration::from_millis(config.storage.save_debounce_ms),
        ));

        let manager = EditorManager::new(
            TextWidget::new(),
            Rc::clone(&settings) as Rc<dyn SettingsProvider>,
            Rc::clone(&cache) as Rc<dyn PersistenceSink>,
            ManagerOptions::from(&config.session),
        );

        log::info!("Loading project from {}", project_dir.display());
        Ok(Self {
            config,
            config_path,
            settings,
            project,
            cache,
            manager,
            loader: Some(spawn_dir_loader(project_dir)),
            loaded: Vec::new(),
            settings_pane: false,
            status: None,
            should_quit: false,
            needs_redraw: true,
        })
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Resize(_, _) => self.needs_redraw = true,
                    _ => {}
                }
            }
            self.tick();

            if self.needs_redraw {
                terminal.draw(|frame| ui::render(frame, self))?;
                self.needs_redraw = false;
            }
        }
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_some()
    }

    pub fn has_pending_save(&self) -> bool {
        self.cache.has_pending()
    }

    pub fn settings(&self) -> EditorSettings {
        self.settings.borrow().clone()
    }

    /// Periodic work between input events.
    pub fn tick(&mut self) {
        self.poll_loader();
        if self.cache.flush_due() {
            log::debug!("Flushed debounced project save");
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.needs_redraw = true;

        if self.settings_pane {
            if let Some(action) = PaneAction::from_key(&key) {
                self.handle_pane_action(action);
                return;
            }
        }

        if let Some(action) = HostAction::from_key(&key) {
            self.handle_host_action(action);
            return;
        }

        self.manager.widget_mut().handle_key(key);
        for request in self.manager.take_host_requests() {
            match request {
                HostRequest::ToggleSettingsPane => self.settings_pane = !self.settings_pane,
            }
        }
    }

    fn handle_host_action(&mut self, action: HostAction) {
        match action {
            HostAction::NextFile => self.step_file(1),
            HostAction::PrevFile => self.step_file(-1),
            HostAction::CloseFile => {
                let bound = self
                    .manager
                    .bound_file()
                    .filter(|name| self.manager.has_session(name))
                    .map(str::to_string);
                if let Some(name) = bound {
                    self.dispatch(EditorMessage::CloseFile(name.clone()));
                    self.set_info(format!("Closed session for {}", name));
                }
            }
            HostAction::ClearEditor => self.dispatch(EditorMessage::ClearEditor),
            HostAction::ToggleTheme => {
                let settings = self.settings().with_toggled_theme();
                self.apply_settings(settings);
            }
            HostAction::Quit => {
                self.cache.flush();
                self.should_quit = true;
            }
        }
    }

    fn handle_pane_action(&mut self, action: PaneAction) {
        let mut settings = self.settings();
        match action {
            PaneAction::Close => {
                self.settings_pane = false;
                return;
            }
            PaneAction::TabSizeUp => settings.tab_size += 1,
            PaneAction::TabSizeDown => settings.tab_size = settings.tab_size.saturating_sub(1),
            PaneAction::ToggleSoftTabs => settings.soft_tabs = !settings.soft_tabs,
            PaneAction::ToggleWordWrap => settings.word_wrap = !settings.word_wrap,
            PaneAction::ToggleTheme => settings = settings.with_toggled_theme(),
        }
        self.apply_settings(settings.normalized());
    }

    /// Store new settings and push them to the editor.
    fn apply_settings(&mut self, settings: EditorSettings) {
        *self.settings.borrow_mut() = settings.clone();
        self.config.editor = settings.clone();
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                log::warn!("Failed to save settings: {:#}", e);
            }
        }
        self.dispatch(EditorMessage::SettingsChanged(settings));
    }

    fn step_file(&mut self, delta: isize) {
        let file = {
            let project = self.project.borrow();
            if project.is_empty() {
                return;
            }
            let len = project.len() as isize;
            let current = self
                .manager
                .bound_file()
                .and_then(|name| project.index_of(name))
                .map_or(-1, |i| i as isize);
            let next = if current < 0 && delta < 0 {
                len - 1
            } else {
                (current + delta).rem_euclid(len)
            };
            project.files().get(next as usize).cloned()
        };
        self.open(file);
    }

    fn open(&mut self, file: Option<SharedFile>) {
        self.dispatch(EditorMessage::OpenFile(file));
    }

    fn dispatch(&mut self, message: EditorMessage) {
        if let Err(e) = self.manager.dispatch(message) {
            self.set_error(e.to_string());
        }
    }

    fn poll_loader(&mut self) {
        let Some(rx) = self.loader.take() else {
            return;
        };
        loop {
            match rx.try_recv() {
                Ok(LoadEvent::File(record)) => self.loaded.push(record),
                Ok(LoadEvent::Done) | Err(TryRecvError::Disconnected) => {
                    self.finish_loading();
                    return;
                }
                Err(TryRecvError::Empty) => {
                    self.loader = Some(rx);
                    return;
                }
            }
        }
    }

    /// Hand loaded files to the editor and bind the main sketch.
    fn finish_loading(&mut self) {
        let mut records = std::mem::take(&mut self.loaded);
        if records.is_empty() {
            records = match self.cache.load_snapshot().filter(|files| !files.is_empty()) {
                Some(files) => {
                    log::info!("Project is empty, restoring {} cached file(s)", files.len());
                    files
                }
                None => {
                    log::info!("Project is empty, starting a new sketch");
                    Project::with_default_sketch().snapshot()
                }
            };
        }
        // Main sketch first so restored code lands in it
        records.sort_by_key(|record| record.name != MAIN_FILE_NAME);

        let count = records.len();
        let sender = self.manager.loaded_file_sender();
        for record in records {
            if sender.send(record).is_err() {
                log::error!("Loaded-file channel closed");
            }
        }
        let project = Rc::clone(&self.project);
        self.manager
            .process_loaded_files(|record| project.borrow_mut().add(record));

        let main = self.project.borrow().main_file();
        self.open(main);
        self.set_info(format!("Loaded {} file(s)", count));
        self.needs_redraw = true;
    }

    fn set_info(&mut self, text: String) {
        self.status = Some(StatusMessage {
            text,
            is_error: false,
        });
    }

    fn set_error(&mut self, text: String) {
        self.status = Some(StatusMessage {
            text,
            is_error: true,
        });
    }
}
