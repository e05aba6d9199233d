//! Terminal text widget backing sketchpad edit sessions.
//!
//! `TextWidget` implements `EditorWidget`: it stores every buffer the editor
//! creates, keeps one of them attached to the visible surface, executes
//! key-bound commands, and renders the attached buffer with ratatui,
//! syntax-highlighted by its mode.

mod keys;
mod render;
mod search;
mod session;

use std::collections::HashMap;

use sketchpad_core::{
    ChangeListener, CommandAction, CommandSpec, EditorWidget, HostRequest, Mode, SessionId,
    SessionOptions, ThemeKind,
};
use sketchpad_keyboard::{KeyChord, Platform};
use sketchpad_text_search::SearchDirection;

use search::{SearchState, SEARCH_COMMANDS};
use session::Session;

pub use sketchpad_buffer::Cursor;

/// Registered command with its chord resolved for the current platform.
#[derive(Debug, Clone, Copy)]
struct BoundCommand {
    spec: CommandSpec,
    chord: Option<KeyChord>,
}

/// Single-surface text widget.
#[derive(Debug)]
pub struct TextWidget {
    sessions: HashMap<SessionId, Session>,
    next_id: u64,
    active: Option<SessionId>,
    read_only: bool,
    focused: bool,
    theme: ThemeKind,
    platform: Platform,
    commands: Vec<BoundCommand>,
    host_requests: Vec<HostRequest>,
    search: SearchState,
}

impl Default for TextWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl TextWidget {
    /// Create a widget for the current platform.
    pub fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    /// Create a widget resolving bindings for a specific platform.
    ///
    /// The search commands are registered up front.
    pub fn for_platform(platform: Platform) -> Self {
        let mut widget = Self {
            sessions: HashMap::new(),
            next_id: 1,
            active: None,
            read_only: false,
            focused: false,
            theme: ThemeKind::default(),
            platform,
            commands: Vec::new(),
            host_requests: Vec::new(),
            search: SearchState::default(),
        };
        for command in SEARCH_COMMANDS {
            widget.add_command(command);
        }
        widget
    }

    /// Number of buffers the widget holds (bound or not).
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Cursor of the attached buffer.
    pub fn cursor(&self) -> Option<Cursor> {
        self.active_ref().map(|s| s.cursor)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Names of registered commands, in registration order.
    pub fn command_names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.spec.name).collect()
    }

    /// Run a registered command by name.
    ///
    /// Returns `false` if no such command exists.
    pub fn exec_command(&mut self, name: &str) -> bool {
        let action = self
            .commands
            .iter()
            .find(|c| c.spec.name == name)
            .map(|c| c.spec.action);
        match action {
            Some(action) => {
                self.run_action(action);
                true
            }
            None => false,
        }
    }

    fn run_action(&mut self, action: CommandAction) {
        match action {
            CommandAction::BlockIndent => self.block_indent(),
            CommandAction::BlockOutdent => self.block_outdent(),
            CommandAction::Find => self.open_search(),
            CommandAction::FindNext => self.find_step(SearchDirection::Forward),
            CommandAction::FindPrevious => self.find_step(SearchDirection::Backward),
            CommandAction::Host(request) => self.host_requests.push(request),
        }
    }

    fn active_ref(&self) -> Option<&Session> {
        self.active.and_then(|id| self.sessions.get(&id))
    }

    fn active_mut(&mut self) -> Option<&mut Session> {
        let id = self.active?;
        self.sessions.get_mut(&id)
    }

    /// Apply an edit to the attached buffer and notify its listener once.
    ///
    /// Ignored while the surface is read-only.
    fn edit_active<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Session) -> anyhow::Result<()>,
    {
        if self.read_only {
            return;
        }
        let Some(session) = self.active_mut() else {
            return;
        };
        let version = session.buffer.version();
        if let Err(e) = f(session) {
            log::warn!("Edit failed: {}", e);
        }
        session.notify_if_changed(version);
    }

    fn block_indent(&mut self) {
        self.edit_active(|session| {
            let unit = session.indent_unit();
            session.buffer.indent_line(session.cursor.line, &unit)?;
            session.cursor.column += unit.chars().count();
            Ok(())
        });
    }

    fn block_outdent(&mut self) {
        self.edit_active(|session| {
            let tab_size = session.options.tab_size;
            let removed = session.buffer.outdent_line(session.cursor.line, tab_size)?;
            session.cursor.column = session.cursor.column.saturating_sub(removed);
            Ok(())
        });
    }
}

impl EditorWidget for TextWidget {
    fn create_session(&mut self, text: &str, mode: Mode) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.insert(id, Session::new(text, mode));
        id
    }

    fn set_session(&mut self, id: SessionId) {
        if self.sessions.contains_key(&id) {
            self.active = Some(id);
        } else {
            log::warn!("Ignoring bind of unknown session {:?}", id);
        }
    }

    fn destroy_session(&mut self, id: SessionId) {
        if self.sessions.remove(&id).is_none() {
            return;
        }
        if self.active == Some(id) {
            self.active = None;
            self.close_search();
        }
    }

    fn active_session(&self) -> Option<SessionId> {
        self.active
    }

    fn session_text(&self, id: SessionId) -> Option<String> {
        self.sessions.get(&id).map(|s| s.buffer.text())
    }

    fn session_mode(&self, id: SessionId) -> Option<Mode> {
        self.sessions.get(&id).map(|s| s.mode)
    }

    fn session_options(&self, id: SessionId) -> Option<SessionOptions> {
        self.sessions.get(&id).map(|s| s.options)
    }

    fn set_value(&mut self, id: SessionId, text: &str) {
        if let Some(session) = self.sessions.get_mut(&id) {
            let version = session.buffer.version();
            session.buffer.set_text(text);
            session.cursor = session.buffer.clamp(session.cursor);
            session.notify_if_changed(version);
        }
    }

    fn set_change_listener(&mut self, id: SessionId, listener: ChangeListener) {
        if let Some(session) = self.sessions.get_mut(&id) {
            session.listener = Some(listener);
        }
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn set_tab_size(&mut self, tab_size: usize) {
        if let Some(session) = self.active_mut() {
            session.options.tab_size = tab_size.max(1);
        }
    }

    fn set_use_soft_tabs(&mut self, soft_tabs: bool) {
        if let Some(session) = self.active_mut() {
            session.options.soft_tabs = soft_tabs;
        }
    }

    fn set_use_wrap_mode(&mut self, word_wrap: bool) {
        if let Some(session) = self.active_mut() {
            session.options.word_wrap = word_wrap;
        }
    }

    fn set_theme(&mut self, theme: ThemeKind) {
        self.theme = theme;
    }

    fn theme(&self) -> ThemeKind {
        self.theme
    }

    fn goto_line(&mut self, line: usize, column: usize) {
        if let Some(session) = self.active_mut() {
            let target = Cursor::at(line.saturating_sub(1), column);
            session.cursor = session.buffer.clamp(target);
        }
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn add_command(&mut self, command: CommandSpec) {
        let chord = command.binding.chord(self.platform);
        if chord.is_none() {
            log::warn!(
                "Command '{}' has an unparsable binding '{}'",
                command.name,
                command.binding.for_platform(self.platform)
            );
        }
        // Re-registering a name replaces the previous binding
        self.commands.retain(|c| c.spec.name != command.name);
        self.commands.push(BoundCommand {
            spec: command,
            chord,
        });
    }

    fn take_host_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.host_requests)
    }
}
