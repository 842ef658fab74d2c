//! Terminal User Interface for Karte

mod event;
mod render;

use anyhow::Result;
use event::{Event, Handler};
use karte::app::App;
use karte::config::key_name;
use ratatui::crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tracing::debug;

/// Run the TUI application
pub fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &Handler::default());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &Handler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        match event_handler.next()? {
            Event::Key(key) => handle_key_event(app, key.code, key.modifiers),
            Event::Paste(text) => app.handle_paste(&text),
            Event::Tick => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        app.quit();
        return;
    }
    match key_name(code, modifiers) {
        Some(name) => {
            app.handle_key(&name);
        }
        None => debug!(?code, ?modifiers, "Ignoring key"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karte::config::Config;

    #[test]
    fn test_ctrl_c_quits() -> Result<()> {
        let mut app = App::new(Config::default())?;
        handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
        Ok(())
    }

    #[test]
    fn test_keys_reach_the_menu() -> Result<()> {
        let mut app = App::new(Config::default())?;
        handle_key_event(&mut app, KeyCode::Char('v'), KeyModifiers::NONE);
        assert_eq!(app.navigation.path, vec!['v']);
        handle_key_event(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.navigation.path.is_empty());
        assert!(!app.should_quit);
        Ok(())
    }

    #[test]
    fn test_alt_keys_are_ignored() -> Result<()> {
        let mut app = App::new(Config::default())?;
        handle_key_event(&mut app, KeyCode::Char('v'), KeyModifiers::ALT);
        assert!(app.navigation.path.is_empty());
        assert!(app.flash.is_none());
        Ok(())
    }
}
