//! Text widget capabilities required by the editor.

use sketchpad_keyboard::PlatformBinding;
use sketchpad_theme::ThemeKind;

use crate::{HostRequest, Mode};

/// Opaque handle to a widget buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Called with the full buffer text after every edit batch.
pub type ChangeListener = Box<dyn FnMut(&str)>;

/// Per-session formatting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub tab_size: usize,
    pub soft_tabs: bool,
    pub word_wrap: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            soft_tabs: true,
            word_wrap: false,
        }
    }
}

/// What a key-bound command does when triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Remove one indentation level from the cursor line
    BlockOutdent,
    /// Add one indentation level to the cursor line
    BlockIndent,
    /// Open the search prompt of the surface
    Find,
    /// Jump to the next search match, wrapping at the end
    FindNext,
    /// Jump to the previous search match, wrapping at the start
    FindPrevious,
    /// Forward a request to the host application
    Host(HostRequest),
}

/// Key-bound command registered with the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub binding: PlatformBinding,
    pub action: CommandAction,
}

/// Text-editing widget with one visible surface and many buffers.
///
/// The widget owns buffer storage. Exactly one session (or none, before the
/// first bind) is attached to the surface at a time.
pub trait EditorWidget {
    /// Create a detached buffer.
    fn create_session(&mut self, text: &str, mode: Mode) -> SessionId;

    /// Attach a buffer to the surface, replacing the current one.
    fn set_session(&mut self, id: SessionId);

    /// Free a buffer and its listener. Destroying the attached buffer
    /// leaves the surface empty.
    fn destroy_session(&mut self, id: SessionId);

    /// Buffer attached to the surface.
    fn active_session(&self) -> Option<SessionId>;

    /// Full text of a buffer.
    fn session_text(&self, id: SessionId) -> Option<String>;

    /// Mode of a buffer.
    fn session_mode(&self, id: SessionId) -> Option<Mode>;

    /// Formatting options of a buffer.
    fn session_options(&self, id: SessionId) -> Option<SessionOptions>;

    /// Replace the text of a buffer. Counts as one edit batch.
    fn set_value(&mut self, id: SessionId, text: &str);

    /// Install the change listener of a buffer, replacing any previous one.
    fn set_change_listener(&mut self, id: SessionId, listener: ChangeListener);

    fn set_read_only(&mut self, read_only: bool);
    fn is_read_only(&self) -> bool;

    /// Tab width of the attached buffer.
    fn set_tab_size(&mut self, tab_size: usize);
    /// Soft tabs of the attached buffer.
    fn set_use_soft_tabs(&mut self, soft_tabs: bool);
    /// Wrap mode of the attached buffer.
    fn set_use_wrap_mode(&mut self, word_wrap: bool);

    fn set_theme(&mut self, theme: ThemeKind);
    fn theme(&self) -> ThemeKind;

    /// Move the cursor of the attached buffer (1-based line, 0-based column).
    fn goto_line(&mut self, line: usize, column: usize);

    /// Give keyboard focus to the surface.
    fn focus(&mut self);

    /// Register a key-bound command.
    fn add_command(&mut self, command: CommandSpec);

    /// Drain host requests raised by commands.
    fn take_host_requests(&mut self) -> Vec<HostRequest>;
}
