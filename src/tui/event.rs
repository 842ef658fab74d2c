//! Terminal event polling

use anyhow::Result;
use ratatui::crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Terminal events the UI reacts to
#[derive(Debug, Clone)]
pub enum Event {
    /// Nothing to handle; redraw
    Tick,
    /// Key press
    Key(KeyEvent),
    /// Bracketed paste
    Paste(String),
}

/// Handler that polls for terminal events
#[derive(Debug)]
pub struct Handler {
    tick_rate: Duration,
}

impl Handler {
    /// Create a new event handler with the given tick rate
    #[must_use]
    pub const fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    ///
    /// # Errors
    ///
    /// Returns an error if polling fails
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                CrosstermEvent::Paste(text) => Ok(Event::Paste(text)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new(100)
    }
}
