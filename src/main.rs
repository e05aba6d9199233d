mod app;
mod hotkeys;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

use sketchpad_config::Config;

use app::App;

/// Log entries kept in memory for the settings pane.
const MAX_LOG_ENTRIES: usize = 500;

fn main() -> Result<()> {
    let config_path = Config::config_file_path().ok();
    let config = match &config_path {
        Some(path) => Config::load_from(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config, using defaults: {:#}", e);
            Config::default()
        }),
        None => Config::default(),
    };

    sketchpad_logger::init(
        config.logging.file_path.as_ref().map(PathBuf::from),
        MAX_LOG_ENTRIES,
        sketchpad_logger::parse_level(&config.logging.min_level),
    );

    let project_dir = match std::env::args_os().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };
    let mut app = App::new(config, config_path, project_dir)?;

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();

    // Ctrl-[ and Ctrl-, are only distinguishable with the kitty keyboard protocol
    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);

    execute!(stdout, EnterAlternateScreen)?;
    if keyboard_enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    if keyboard_enhanced {
        let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
