//! Constants for the editor panel.

use sketchpad_core::{CommandAction, CommandSpec, HostRequest};
use sketchpad_keyboard::PlatformBinding;

/// Cursor position after the cached code is restored (1-based line, column).
pub const RESTORE_CURSOR: (usize, usize) = (2, 2);

/// Commands registered with the widget at construction.
pub const EDITOR_COMMANDS: [CommandSpec; 3] = [
    CommandSpec {
        name: "blockoutdent",
        binding: PlatformBinding::new("Ctrl-[", "Command-["),
        action: CommandAction::BlockOutdent,
    },
    CommandSpec {
        name: "blockindent",
        binding: PlatformBinding::new("Ctrl-]", "Command-]"),
        action: CommandAction::BlockIndent,
    },
    CommandSpec {
        name: "Preferences",
        binding: PlatformBinding::new("Ctrl-,", "Command-,"),
        action: CommandAction::Host(HostRequest::ToggleSettingsPane),
    },
];
