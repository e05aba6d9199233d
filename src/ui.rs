//! Screen layout: editor surface, optional settings pane, status bar.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use sketchpad_core::EditorWidget;
use sketchpad_theme::Theme;

use crate::app::App;

const SETTINGS_PANE_WIDTH: u16 = 34;
const PANE_LOG_LINES: usize = 6;

pub fn render(frame: &mut Frame, app: &mut App) {
    let theme = app.manager.widget().theme().theme();
    let [main, status] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    let editor_area = if app.settings_pane {
        let [editor, pane] =
            Layout::horizontal([Constraint::Min(10), Constraint::Length(SETTINGS_PANE_WIDTH)])
                .areas(main);
        render_settings_pane(frame, app, theme, pane);
        editor
    } else {
        main
    };

    if let Some(position) = app.manager.widget_mut().render(editor_area, frame.buffer_mut()) {
        frame.set_cursor_position(position);
    }
    render_status_bar(frame, app, theme, status);
}

fn render_settings_pane(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let settings = app.settings();
    let on_off = |flag: bool| if flag { "on" } else { "off" };
    let key = Style::default().fg(theme.accent);

    let mut lines = vec![
        pane_line("+/- ", key, format!("Tab size: {}", settings.tab_size)),
        pane_line("s   ", key, format!("Soft tabs: {}", on_off(settings.soft_tabs))),
        pane_line("w   ", key, format!("Word wrap: {}", on_off(settings.word_wrap))),
        pane_line("t   ", key, format!("Theme: {}", settings.editor_theme)),
        pane_line("Esc ", key, "Close".to_string()),
        Line::default(),
        Line::styled("Log", Style::default().add_modifier(Modifier::BOLD)),
    ];

    let entries = sketchpad_logger::get_entries();
    let skip = entries.len().saturating_sub(PANE_LOG_LINES);
    lines.extend(entries.into_iter().skip(skip).map(|entry| {
        Line::raw(format!("{} {:<5} {}", entry.timestamp, entry.level, entry.message))
    }));

    let pane = Paragraph::new(lines)
        .style(Style::default().fg(theme.fg).bg(theme.bg))
        .block(
            Block::bordered()
                .title(" Settings ")
                .border_style(Style::default().fg(theme.accent)),
        );
    frame.render_widget(pane, area);
}

fn pane_line(key: &'static str, key_style: Style, text: String) -> Line<'static> {
    Line::from(vec![Span::styled(key, key_style), Span::raw(text)])
}

fn render_status_bar(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let widget = app.manager.widget();
    let name = app.manager.bound_file().unwrap_or("[scratch]");
    let mode = widget
        .active_session()
        .and_then(|id| widget.session_mode(id))
        .map(|mode| mode.name())
        .unwrap_or("-");

    let mut spans = vec![
        Span::styled(format!(" {} ", name), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{} ", mode)),
    ];
    if widget.is_read_only() {
        spans.push(Span::styled("RO ", Style::default().fg(theme.accent)));
    }
    if app.has_pending_save() {
        spans.push(Span::raw("unsaved "));
    }
    if app.is_loading() {
        spans.push(Span::raw("loading... "));
    }
    spans.push(Span::raw(format!(
        "{}/{} files ",
        app.manager.session_count(),
        app.project.borrow().len()
    )));

    match &app.status {
        Some(message) if message.is_error => {
            spans.push(Span::styled(message.text.clone(), Style::default().fg(theme.error)))
        }
        Some(message) => spans.push(Span::raw(message.text.clone())),
        None => spans.push(Span::raw("Ctrl-Q quit  Ctrl-, settings")),
    }

    let bar = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(theme.status_fg).bg(theme.status_bg));
    frame.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use sketchpad_config::Config;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_bound_file_and_pane() {
        let project_dir = TempDir::new().unwrap();
        let cache_dir = TempDir::new().unwrap();
        std::fs::write(project_dir.path().join("sketch.js"), "noLoop();").unwrap();
        let mut config = Config::default();
        config.storage.cache_dir = Some(cache_dir.path().to_path_buf());
        config.session.restore_latest_code = false;

        let mut app = App::new(config, None, project_dir.path().to_path_buf()).unwrap();
        let started = Instant::now();
        while app.is_loading() && started.elapsed() < Duration::from_secs(5) {
            app.tick();
            std::thread::sleep(Duration::from_millis(5));
        }

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("noLoop();"));
        assert!(text.contains("sketch.js"));
        assert!(!text.contains("Settings"));

        app.settings_pane = true;
        terminal.draw(|frame| render(frame, &mut app)).unwrap();
        assert!(screen_text(&terminal).contains("Settings"));
    }
}
